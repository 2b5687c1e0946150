//! MIME type detection module
//!
//! Returns the Content-Type for a file extension. The table covers what a
//! front-end project directory typically contains; anything unknown falls
//! back to `application/octet-stream`.

/// Get MIME Content-Type based on file extension
pub fn content_type_for(extension: Option<&str>) -> &'static str {
    match extension {
        // Text
        Some("html" | "htm") => "text/html; charset=utf-8",
        Some("css") => "text/css",
        Some("txt" | "md") => "text/plain; charset=utf-8",
        Some("xml") => "application/xml",

        // JavaScript/WASM
        Some("js" | "mjs") => "application/javascript",
        Some("json" | "map") => "application/json",
        Some("wasm") => "application/wasm",

        // Images
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("ico") => "image/x-icon",
        Some("webp") => "image/webp",

        // Media
        Some("mp4") => "video/mp4",
        Some("webm") => "video/webm",
        Some("mp3") => "audio/mpeg",
        Some("wav") => "audio/wav",

        // Fonts
        Some("woff") => "font/woff",
        Some("woff2") => "font/woff2",
        Some("ttf") => "font/ttf",
        Some("otf") => "font/otf",

        // Documents
        Some("pdf") => "application/pdf",
        Some("zip") => "application/zip",

        // Default
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_types() {
        assert_eq!(content_type_for(Some("html")), "text/html; charset=utf-8");
        assert_eq!(content_type_for(Some("css")), "text/css");
        assert_eq!(content_type_for(Some("js")), "application/javascript");
        assert_eq!(content_type_for(Some("json")), "application/json");
        assert_eq!(content_type_for(Some("map")), "application/json");
        assert_eq!(content_type_for(Some("png")), "image/png");
        assert_eq!(content_type_for(Some("pdf")), "application/pdf");
    }

    #[test]
    fn test_unknown_extension() {
        assert_eq!(content_type_for(Some("xyz")), "application/octet-stream");
        assert_eq!(content_type_for(None), "application/octet-stream");
    }
}
