use rand::distributions::Alphanumeric;
use rand::Rng;

/// Length of the random stem given to uploaded files.
pub const UPLOAD_ID_LEN: usize = 21;
/// Length of the random suffix appended to downloaded files.
pub const DOWNLOAD_SUFFIX_LEN: usize = 8;

/// Random identifier of `len` characters from `A-Z`, `a-z` and `0-9`.
///
/// Collisions are only bounded by the birthday limit; callers needing
/// uniqueness must disambiguate elsewhere.
pub fn generate_id(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}
