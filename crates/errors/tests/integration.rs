//! Integration tests for error types

#[cfg(test)]
mod tests {
    use sheetcheck_errors::*;

    #[test]
    fn test_error_conversion() {
        let doc_err = DocumentError::Corrupt {
            path: "INS1_a.xlsx".into(),
            message: "bad zip".into(),
        };
        let err: Error = doc_err.into();
        assert!(matches!(err, Error::Document(_)));
        assert!(err.is_document_failure());
    }

    #[test]
    fn test_storage_is_not_document_failure() {
        let err: Error = StorageError::WriteFailed {
            count: 7,
            message: "disk I/O error".into(),
        }
        .into();
        assert!(!err.is_document_failure());
        assert_eq!(err.user_code(), Some("storage.write_failed"));
        assert!(err.is_retryable());
    }

    #[test]
    fn test_error_display() {
        let err = DocumentError::NotFound {
            path: "/data/INS1_a.xlsx".into(),
        };
        assert_eq!(err.to_string(), "document not found: /data/INS1_a.xlsx");
    }

    #[test]
    fn test_check_error_display_is_bare_message() {
        let err = CheckError::failed("no worksheets found");
        assert_eq!(err.to_string(), "no worksheets found");
    }

    #[test]
    fn test_io_error_conversion_with_path() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "test");
        let doc_err = DocumentError::from_io_with_path(&io_err, std::path::Path::new("x.xlsx"));
        assert!(matches!(doc_err, DocumentError::PermissionDenied { .. }));

        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: Error = io_err.into();
        assert!(matches!(
            err,
            Error::Io {
                kind: std::io::ErrorKind::NotFound,
                ..
            }
        ));
    }

    #[test]
    fn test_exhausted_versions_fail_the_document() {
        let err: Error = VersionError::Exhausted {
            entity: "INS1".into(),
            document: "INS1_a.xlsx".into(),
        }
        .into();
        assert!(err.is_document_failure());
        assert!(!err.is_retryable());
        assert_eq!(err.user_code(), Some("version.exhausted"));
        assert_eq!(
            err.to_string(),
            "version error: no version numbers left for INS1/INS1_a.xlsx"
        );
    }
}
