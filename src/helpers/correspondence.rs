//! Checks that a copy-style job wrote one output per input.
//!
//! Listings are compared pairwise, in order:
//!
//! ```text
//! input/2011/11/02/in/tfidf1   <->  output/2011/11/02/in/tfidf1
//! input/2011/11/03/input1      <->  output/2011/11/03/input1
//! ```
//!
//! The first segment must be the respective root and everything between the
//! first and last `/` must agree. File names may differ.

use tracing::debug;

/// Whether `inputs` and `outputs` correspond one to one under their roots.
///
/// Both lists must come from the same kind of ordered listing. Paths without
/// a `/` never correspond.
pub fn validate_one_to_one<S: AsRef<str>>(
    input_root: &str,
    output_root: &str,
    inputs: &[S],
    outputs: &[S],
) -> bool {
    if inputs.len() != outputs.len() {
        debug!(
            inputs = inputs.len(),
            outputs = outputs.len(),
            "listing sizes differ"
        );
        return false;
    }

    inputs.iter().zip(outputs).all(|(input, output)| {
        let (input, output): (&str, &str) = (input.as_ref(), output.as_ref());
        let ok = match (split_path(input), split_path(output)) {
            (Some((iroot, idir)), Some((oroot, odir))) => {
                iroot == input_root && oroot == output_root && idir == odir
            }
            _ => false,
        };
        if !ok {
            debug!(input, output, "no correspondence");
        }
        ok
    })
}

/// `root/dir/parts/name` into (`root`, `/dir/parts`).
fn split_path(path: &str) -> Option<(&str, &str)> {
    let first = path.find('/')?;
    let last = path.rfind('/')?;
    Some((&path[..first], &path[first..last]))
}
