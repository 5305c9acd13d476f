const PATIENT_RESOURCE: &str = "Patient";
const HISTORY_SEGMENT: &str = "/_history/";

///
/// Resolves the patient id from a reference such as `Patient/patient-7`.
///
/// The id is the last path segment. A bare id is accepted, as is an absolute
/// URL ending in `Patient/<id>`. References to another resource type, and
/// references with an empty last segment, resolve to `None`.
///
/// A version suffix such as `Patient/patient-7/_history/2` is ignored.
///
pub fn patient_id(reference: &str) -> Option<&str> {
    let mut segments = unversioned(reference.trim()).rsplit('/');

    let id = segments.next().filter(|id| !id.is_empty())?;

    match segments.next() {
        None => Some(id),
        Some(resource) if resource == PATIENT_RESOURCE => Some(id),
        Some(_) => None,
    }
}

fn unversioned(reference: &str) -> &str {
    match reference.rsplit_once(HISTORY_SEGMENT) {
        Some((resource, version)) if !version.contains('/') => resource,
        _ => reference,
    }
}
