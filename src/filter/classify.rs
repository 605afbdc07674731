//! Name-based classification of binary assets and dependency lock files.

/// Extensions treated as binary. Matched as a case-sensitive suffix of the file name.
///
/// `.svg` is listed on purpose: vector markup is rarely useful prompt context.
const BINARY_EXTENSIONS: &[&str] = &[
    // Fonts
    ".woff", ".woff2", ".eot", ".ttf", ".otf",
    // Images and documents
    ".png", ".jpg", ".jpeg", ".gif", ".bmp", ".pdf", ".ico", ".svg", ".icon", ".webp",
    // Archives and executables
    ".zip", ".exe", ".dll",
    // Video
    ".mp4", ".webm", ".mpeg", ".mpg", ".mov",
    // Audio
    ".mp3", ".wav", ".aac", ".ogg", ".flac", ".aiff", ".midi",
];

const LOCK_FILE_NAMES: &[&str] = &["package-lock.json", "pnpm-lock.yaml", "yarn.lock", "Gemfile.lock"];

/// Check if a file name ends in a known binary extension.
pub fn is_binary_name(name: &str) -> bool {
    BINARY_EXTENSIONS.iter().any(|ext| name.ends_with(ext))
}

/// Check if a bare file name is a dependency lock file.
///
/// Only exact names match: `yarn.lock.bak` is not a lock file.
pub fn is_lock_file(name: &str) -> bool {
    LOCK_FILE_NAMES.contains(&name)
}
