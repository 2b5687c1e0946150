//! HTTP Range request parsing module
//!
//! Single-range `bytes` parsing per RFC 7233, enough for media seeking and
//! resumed downloads against the dev server.

/// Parsed byte range
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ByteRange {
    /// Start byte position
    pub start: usize,
    /// End byte position, None means until end of file
    pub end: Option<usize>,
}

impl ByteRange {
    /// Resolve the inclusive end position against the file size
    #[inline]
    pub fn end_position(&self, file_size: usize) -> usize {
        self.end.unwrap_or_else(|| file_size.saturating_sub(1))
    }

    #[cfg(test)]
    pub fn content_length(&self, file_size: usize) -> usize {
        let end = self.end_position(file_size);
        end.saturating_sub(self.start) + 1
    }
}

/// Range header parse result
#[derive(Debug)]
pub enum RangeOutcome {
    /// Valid, satisfiable range request
    Satisfiable(ByteRange),
    /// Range lies beyond the file - should return 416
    NotSatisfiable,
    /// No Range header, or malformed enough to ignore (return full content)
    Ignored,
}

/// Parse an HTTP Range header (single range only, bytes unit).
///
/// Supported forms:
/// - `bytes=start-end`
/// - `bytes=start-`
/// - `bytes=-suffix` (last `suffix` bytes)
///
/// Multi-range requests and non-byte units are ignored rather than
/// rejected, which downgrades them to a full 200 response.
pub fn parse_range_header(range_header: Option<&str>, file_size: usize) -> RangeOutcome {
    let Some(header) = range_header else {
        return RangeOutcome::Ignored;
    };

    let Some(spec) = header.strip_prefix("bytes=") else {
        return RangeOutcome::Ignored;
    };

    if spec.contains(',') {
        return RangeOutcome::Ignored;
    }

    let parts: Vec<&str> = spec.split('-').collect();
    if parts.len() != 2 {
        return RangeOutcome::Ignored;
    }

    let (start_str, end_str) = (parts[0].trim(), parts[1].trim());

    // Suffix range: "-500" means last 500 bytes
    if start_str.is_empty() {
        return parse_suffix_range(end_str, file_size);
    }

    parse_standard_range(start_str, end_str, file_size)
}

fn parse_suffix_range(suffix_str: &str, file_size: usize) -> RangeOutcome {
    let Ok(suffix) = suffix_str.parse::<usize>() else {
        return RangeOutcome::Ignored;
    };

    // An empty file has no satisfiable byte range
    if suffix == 0 || file_size == 0 {
        return RangeOutcome::NotSatisfiable;
    }

    // A suffix longer than the file just means the whole file
    let start = file_size.saturating_sub(suffix);
    RangeOutcome::Satisfiable(ByteRange {
        start,
        end: Some(file_size - 1),
    })
}

fn parse_standard_range(start_str: &str, end_str: &str, file_size: usize) -> RangeOutcome {
    let Ok(start) = start_str.parse::<usize>() else {
        return RangeOutcome::Ignored;
    };

    if start >= file_size {
        return RangeOutcome::NotSatisfiable;
    }

    let end = if end_str.is_empty() {
        None // Open-ended range
    } else {
        let Ok(e) = end_str.parse::<usize>() else {
            return RangeOutcome::Ignored;
        };
        // Clamp end to file size - 1
        Some(e.min(file_size - 1))
    };

    if let Some(e) = end {
        if start > e {
            return RangeOutcome::NotSatisfiable;
        }
    }

    RangeOutcome::Satisfiable(ByteRange { start, end })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_range() {
        assert!(matches!(
            parse_range_header(None, 100),
            RangeOutcome::Ignored
        ));
    }

    #[test]
    fn test_standard_range() {
        match parse_range_header(Some("bytes=0-9"), 100) {
            RangeOutcome::Satisfiable(r) => {
                assert_eq!(r.start, 0);
                assert_eq!(r.end, Some(9));
                assert_eq!(r.content_length(100), 10);
            }
            _ => panic!("Expected Satisfiable"),
        }
    }

    #[test]
    fn test_open_range() {
        match parse_range_header(Some("bytes=50-"), 100) {
            RangeOutcome::Satisfiable(r) => {
                assert_eq!(r.start, 50);
                assert_eq!(r.end, None);
                assert_eq!(r.end_position(100), 99);
                assert_eq!(r.content_length(100), 50);
            }
            _ => panic!("Expected Satisfiable"),
        }
    }

    #[test]
    fn test_suffix_range() {
        match parse_range_header(Some("bytes=-20"), 100) {
            RangeOutcome::Satisfiable(r) => {
                assert_eq!(r.start, 80);
                assert_eq!(r.end, Some(99));
            }
            _ => panic!("Expected Satisfiable"),
        }
    }

    #[test]
    fn test_not_satisfiable() {
        assert!(matches!(
            parse_range_header(Some("bytes=200-"), 100),
            RangeOutcome::NotSatisfiable
        ));
        assert!(matches!(
            parse_range_header(Some("bytes=-0"), 100),
            RangeOutcome::NotSatisfiable
        ));
    }

    #[test]
    fn test_empty_file_ranges_are_not_satisfiable() {
        // Suffix ranges against a zero-byte file must not underflow
        assert!(matches!(
            parse_range_header(Some("bytes=-5"), 0),
            RangeOutcome::NotSatisfiable
        ));
        assert!(matches!(
            parse_range_header(Some("bytes=0-"), 0),
            RangeOutcome::NotSatisfiable
        ));
    }

    #[test]
    fn test_invalid_format_is_ignored() {
        assert!(matches!(
            parse_range_header(Some("bytes=a-b"), 100),
            RangeOutcome::Ignored
        ));
        assert!(matches!(
            parse_range_header(Some("bytes=0-9,20-29"), 100),
            RangeOutcome::Ignored
        ));
        assert!(matches!(
            parse_range_header(Some("items=0-9"), 100),
            RangeOutcome::Ignored
        ));
    }
}
