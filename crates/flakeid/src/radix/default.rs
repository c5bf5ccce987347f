use super::Encoding;
use crate::{
    Result,
    mutex::{RwLock, read_cloned, replace},
};
use std::sync::{Arc, LazyLock};

static DEFAULT_ENCODING: LazyLock<RwLock<Arc<Encoding>>> =
    LazyLock::new(|| RwLock::new(Arc::new(Encoding::DEFAULT)));

/// Returns the process-wide default [`Encoding`].
///
/// The returned handle stays valid for as long as the caller holds it, even if
/// [`set_default_encoding`] publishes a replacement in the meantime.
pub fn default_encoding() -> Arc<Encoding> {
    read_cloned(&DEFAULT_ENCODING)
}

/// Publishes `encoding` as the process-wide default and returns the previous
/// one.
///
/// Calls already holding the previous handle finish against it; the swap never
/// mutates an encoding in place.
pub fn set_default_encoding(encoding: Encoding) -> Arc<Encoding> {
    replace(&DEFAULT_ENCODING, Arc::new(encoding))
}

/// Encodes `x` with the default encoding.
pub fn radix_encode(x: u64) -> String {
    default_encoding().encode(x)
}

/// Decodes `s` with the default encoding.
///
/// # Errors
///
/// See [`Encoding::decode`].
pub fn radix_decode(s: &str) -> Result<u64> {
    default_encoding().decode(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_the_64_symbol_encoding() {
        assert_eq!(*default_encoding(), Encoding::DEFAULT);
        assert_eq!(radix_encode(64), "10");
        assert_eq!(radix_decode("10"), Ok(64));
    }

    #[test]
    fn swap_publishes_new_handle_and_keeps_old_usable() {
        let before = default_encoding();
        // Swap in an equal encoding so concurrently running tests are unaffected.
        let previous = set_default_encoding(Encoding::DEFAULT);
        let after = default_encoding();

        assert!(!Arc::ptr_eq(&previous, &after));
        assert_eq!(*previous, *after);
        assert_eq!(before.encode(4095), "--");
        assert_eq!(previous.decode("--"), Ok(4095));
    }
}
