//! Upload security gate.
//!
//! Every uploaded file passes a fixed pipeline before it touches disk:
//! extension check, size check, executable-signature scan, then a heuristic
//! scan of the leading bytes for script fragments. Each stage rejects with
//! its own message and later stages never run. The stored name is a random
//! hex token so the original filename can never be used for path traversal.

use thiserror::Error;

/// Hard cap on a single upload.
pub const MAX_UPLOAD_BYTES: usize = 2 * 1024 * 1024;

/// Number of leading bytes hex-encoded for the signature scan.
const SIGNATURE_PREFIX_BYTES: usize = 20;

/// Number of leading bytes inspected by the content heuristic.
const CONTENT_SCAN_BYTES: usize = 1000;

/// Extensions rejected outright, before the image allow-list applies.
const DANGEROUS_EXTENSIONS: [&str; 10] = [
    ".exe", ".bat", ".cmd", ".scr", ".pif", ".com", ".jar", ".js", ".vbs", ".ps1",
];

/// The only extensions accepted for upload.
const ALLOWED_EXTENSIONS: [&str; 4] = [".jpg", ".jpeg", ".png", ".gif"];

/// The only declared MIME types accepted for upload.
const ALLOWED_MIME_TYPES: [&str; 3] = ["image/jpeg", "image/png", "image/gif"];

/// Hex prefixes of executable and container formats the scan rejects:
/// PE, ELF, ZIP, Java class, MS compound document, PDF.
const EXECUTABLE_SIGNATURES: [&str; 6] = [
    "4d5a", "7f454c46", "504b0304", "cafebabe", "d0cf11e0", "25504446",
];

/// Script fragments searched for in the leading bytes.
const SUSPICIOUS_FRAGMENTS: [&str; 6] = [
    "<script",
    "javascript:",
    "vbscript:",
    "eval(",
    "exec(",
    "system(",
];

/// Stage-specific rejection raised by the gate. All map to 400 responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum UploadRejection {
    #[error("dangerous file type")]
    DangerousFileType,
    #[error("Only images allowed")]
    NotAnImage,
    #[error("File too large (max 2MB)")]
    TooLarge,
    #[error("File failed security scan")]
    FailedSecurityScan,
}

/// Lowercased extension of `name`, including the dot.
#[must_use]
pub fn file_extension(name: &str) -> Option<String> {
    name.rfind('.')
        .and_then(|idx| name.get(idx..))
        .map(str::to_ascii_lowercase)
}

/// Reject dangerous extensions, then require an image extension and a
/// matching declared MIME type.
pub fn check_extension(original_name: &str, declared_mime: &str) -> Result<(), UploadRejection> {
    let lowered = original_name.to_ascii_lowercase();
    if DANGEROUS_EXTENSIONS.iter().any(|ext| lowered.ends_with(ext)) {
        return Err(UploadRejection::DangerousFileType);
    }
    let extension_ok = ALLOWED_EXTENSIONS.iter().any(|ext| lowered.ends_with(ext));
    let mime_ok = ALLOWED_MIME_TYPES.contains(&declared_mime);
    if !extension_ok || !mime_ok {
        return Err(UploadRejection::NotAnImage);
    }
    Ok(())
}

/// Enforce the upload byte cap.
pub fn check_size(size: usize) -> Result<(), UploadRejection> {
    if size > MAX_UPLOAD_BYTES {
        return Err(UploadRejection::TooLarge);
    }
    Ok(())
}

/// Reject files whose leading bytes match a known executable signature.
///
/// The declared extension is irrelevant here; a renamed `.exe` still starts
/// with the PE magic.
pub fn scan_signature(bytes: &[u8]) -> Result<(), UploadRejection> {
    let prefix = bytes.get(..SIGNATURE_PREFIX_BYTES).unwrap_or(bytes);
    let encoded = hex::encode(prefix);
    if EXECUTABLE_SIGNATURES
        .iter()
        .any(|signature| encoded.starts_with(signature))
    {
        return Err(UploadRejection::FailedSecurityScan);
    }
    Ok(())
}

/// Reject files whose leading bytes contain script fragments.
pub fn scan_content(bytes: &[u8]) -> Result<(), UploadRejection> {
    let head = bytes.get(..CONTENT_SCAN_BYTES).unwrap_or(bytes);
    let text = String::from_utf8_lossy(head).to_lowercase();
    if SUSPICIOUS_FRAGMENTS
        .iter()
        .any(|fragment| text.contains(fragment))
    {
        return Err(UploadRejection::FailedSecurityScan);
    }
    Ok(())
}

/// Compose the stored filename: the hex token plus the original extension.
#[must_use]
pub fn storage_name(original_name: &str, token: &[u8; 16]) -> String {
    let extension = file_extension(original_name).unwrap_or_default();
    format!("{}{}", hex::encode(token), extension)
}

/// Whether a stored filename is safe to resolve under the upload directory.
///
/// Stored names are flat hex tokens; anything with a path separator or a
/// parent reference was not produced by this gate.
#[must_use]
pub fn is_safe_stored_name(name: &str) -> bool {
    !name.is_empty()
        && !name.contains('/')
        && !name.contains('\\')
        && !name.contains("..")
}
