// src/crawl/filter.rs
// =============================================================================
// Extension filter: decides whether a URL is worth fetching at all.
//
// Images, archives, media, executables and office documents cannot contain
// a page we can crawl, so URLs whose path ends in one of these extensions
// never enter the frontier. This saves a lot of bandwidth on real sites.
//
// Matching rules:
// - Only the path is inspected, so "?v=2" or "#top" cannot hide an extension
// - The comparison ignores case ("/Brochure.PDF" is skipped)
// - A trailing slash after the extension still counts ("/file.zip/")
// =============================================================================

use url::Url;

// Non-HTML extensions. Kept as one flat list so it is easy to extend.
const SKIPPED_EXTENSIONS: &[&str] = &[
    // audio
    ".aif", ".cda", ".mid", ".midi", ".mp3", ".mpa", ".ogg", ".wav", ".wma", ".wpl",
    // archives
    ".7z", ".arj", ".deb", ".pkg", ".rar", ".rpm", ".tar.gz", ".z", ".zip",
    // disc images
    ".bin", ".dmg", ".iso", ".toast", ".vcd",
    // data
    ".csv", ".dat", ".db", ".dbf", ".log", ".mdb", ".sav", ".sql", ".tar",
    // executables and scripts
    ".apk", ".bat", ".cgi", ".pl", ".exe", ".gadget", ".jar", ".py", ".wsf",
    // fonts
    ".fnt", ".fon", ".otf", ".ttf",
    // images
    ".ai", ".bmp", ".gif", ".ico", ".jpeg", ".jpg", ".png", ".ps", ".psd", ".svg", ".tif",
    ".tiff",
    // server-side pages and misc web files
    ".asp", ".cer", ".cfm", ".part", ".rss",
    // presentations
    ".key", ".odp", ".pps", ".ppt", ".pptx",
    // source code
    ".c", ".class", ".cpp", ".cs", ".h", ".java", ".sh", ".swift", ".vb",
    // spreadsheets
    ".ods", ".xlr", ".xls", ".xlsx",
    // system files
    ".bak", ".cab", ".cfg", ".cpl", ".cur", ".dll", ".dmp", ".drv", ".icns", ".ini", ".lnk",
    ".msi", ".sys", ".tmp",
    // video
    ".3g2", ".3gp", ".avi", ".flv", ".h264", ".m4v", ".mkv", ".mov", ".mp4", ".mpg", ".mpeg",
    ".rm", ".swf", ".vob", ".wmv",
    // documents
    ".doc", ".docx", ".odt", ".pdf", ".rtf", ".tex", ".txt", ".wks", ".wps", ".wpd",
];

// Returns true if the URL may point at an HTML page
pub fn is_fetchable(url: &Url) -> bool {
    let path = url.path().to_ascii_lowercase();
    let path = path.strip_suffix('/').unwrap_or(&path);

    !SKIPPED_EXTENSIONS.iter().any(|ext| path.ends_with(ext))
}
