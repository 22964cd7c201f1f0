//! Local host name lookup for the GELF `host` field.

const FALLBACK_HOST: &str = "localhost";

/// Best-effort name of this machine.
pub fn local_hostname() -> String {
    system_hostname()
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| FALLBACK_HOST.to_string())
}

#[cfg(unix)]
fn system_hostname() -> Option<String> {
    let mut buf = [0u8; 256];
    // SAFETY: `buf` is a valid writable buffer of the given length.
    let rc = unsafe { libc::gethostname(buf.as_mut_ptr().cast::<libc::c_char>(), buf.len()) };
    if rc != 0 {
        return None;
    }
    let end = buf.iter().position(|&b| b == 0).unwrap_or(buf.len());
    String::from_utf8(buf[..end].to_vec()).ok()
}

#[cfg(not(unix))]
fn system_hostname() -> Option<String> {
    std::env::var("COMPUTERNAME").ok()
}
