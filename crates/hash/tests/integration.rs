//! Integration tests for hash crate

#[cfg(test)]
mod tests {
    use sheetcheck_hash::*;
    use tempfile::tempdir;
    use tokio::fs;

    #[tokio::test]
    async fn test_identical_bytes_share_fingerprint_regardless_of_name() {
        let dir = tempdir().unwrap();
        let first = dir.path().join("INS1_report.xlsx");
        let second = dir.path().join("renamed copy.xlsx");

        let data = b"same workbook bytes";
        fs::write(&first, data).await.unwrap();
        fs::write(&second, data).await.unwrap();

        let a = Fingerprint::hash_file(&first).await.unwrap();
        let b = Fingerprint::hash_file(&second).await.unwrap();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn test_verify_file() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("test.xlsx");

        let data = b"verify this content";
        fs::write(&file_path, data).await.unwrap();

        let fingerprint = Fingerprint::from_data(data);
        assert!(verify_file(&file_path, &fingerprint).await.unwrap());

        let wrong = Fingerprint::from_data(b"different content");
        assert!(!verify_file(&file_path, &wrong).await.unwrap());
    }

    #[test]
    fn test_fingerprint_from_hex_errors() {
        // Too short
        assert!(Fingerprint::from_hex("1234").is_err());

        // Too long
        assert!(Fingerprint::from_hex(&"a".repeat(66)).is_err());

        // Invalid hex
        assert!(Fingerprint::from_hex("xyz123").is_err());
    }

    #[test]
    fn test_hex_round_trip_through_from_str() {
        let fingerprint = Fingerprint::from_data(b"round trip");
        let parsed: Fingerprint = fingerprint.to_hex().parse().unwrap();
        assert_eq!(parsed, fingerprint);
    }
}
