use chrono::Utc;
use std::path::{Path, PathBuf};

/// Strip path components and anything outside `[A-Za-z0-9._-]` from a
/// client-supplied file name. Whitespace becomes `_`; a name left empty
/// falls back to "upload".
pub fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let cleaned: String = base
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        .collect();
    let cleaned = cleaned.trim_matches('.');
    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned.to_string()
    }
}

/// Stored name for an upload: `{session}_{unix_secs}_{name}`. Two uploads of
/// the same name within the same second still collide; the window is accepted
/// for this tool.
pub fn unique_upload_name(session_id: &str, original: &str) -> String {
    format!(
        "{}_{}_{}",
        sanitize_file_name(session_id),
        Utc::now().timestamp(),
        sanitize_file_name(original)
    )
}

/// Write `bytes` under `dir/name`, creating the directory if missing, and
/// return the stored path.
pub async fn save_upload(dir: &str, name: &str, bytes: &[u8]) -> std::io::Result<PathBuf> {
    tokio::fs::create_dir_all(dir).await?;
    let path = Path::new(dir).join(name);
    tokio::fs::write(&path, bytes).await?;
    Ok(path)
}

/// Translate a stored image path into the externally reachable URL. Only the
/// basename is kept so the on-disk layout never leaks.
pub fn image_url(public_base: &str, image_path: &str) -> String {
    let basename = image_path.rsplit(['/', '\\']).next().unwrap_or(image_path);
    format!("{}/uploads/{}", public_base.trim_end_matches('/'), basename)
}

/// Best-effort image MIME type from the file extension.
pub fn mime_for_name(name: &str) -> &'static str {
    let ext = Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("bmp") => "image/bmp",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_strips_paths_and_hostile_characters() {
        assert_eq!(sanitize_file_name("cat.png"), "cat.png");
        assert_eq!(sanitize_file_name("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_file_name("..\\..\\boot.ini"), "boot.ini");
        assert_eq!(sanitize_file_name("my photo (1).png"), "my_photo_1.png");
        assert_eq!(sanitize_file_name("über.png"), "ber.png");
        assert_eq!(sanitize_file_name(".."), "upload");
        assert_eq!(sanitize_file_name(""), "upload");
    }

    #[test]
    fn unique_name_is_session_then_time_then_name() {
        let name = unique_upload_name("s1", "cat.png");
        let mut parts = name.splitn(3, '_');
        assert_eq!(parts.next(), Some("s1"));
        let secs: i64 = parts.next().unwrap().parse().unwrap();
        assert!(secs > 0);
        assert_eq!(parts.next(), Some("cat.png"));
    }

    #[test]
    fn image_url_keeps_only_the_basename() {
        assert_eq!(
            image_url("http://localhost:5000", "uploads/s1_1_cat.png"),
            "http://localhost:5000/uploads/s1_1_cat.png"
        );
        assert_eq!(
            image_url("http://localhost:5000/", "/srv/app/uploads/s1_1_cat.png"),
            "http://localhost:5000/uploads/s1_1_cat.png"
        );
    }

    #[test]
    fn mime_guesses_from_extension() {
        assert_eq!(mime_for_name("a.PNG"), "image/png");
        assert_eq!(mime_for_name("a.jpeg"), "image/jpeg");
        assert_eq!(mime_for_name("a"), "application/octet-stream");
    }
}
