//! Test example configurations
//! This module verifies that the sample configuration files shipped in docs/ load correctly.

#[cfg(test)]
mod tests {
    use crate::config::BlobkitConfig;
    use crate::extract::{BlobExtractor, DelimiterPair};
    use std::path::Path;

    #[test]
    fn test_example_toml_config() {
        let config_path = Path::new("docs/sample-config/blobkit.toml");
        if config_path.exists() {
            let config =
                BlobkitConfig::from_file(config_path).expect("Failed to load example TOML config");
            config
                .validate()
                .expect("Example TOML config validation failed");

            assert_eq!(
                config.extraction.delimiters().unwrap(),
                DelimiterPair::code_tags()
            );
            assert!(config.extraction.markdown_fallback);
            assert!(!config.extraction.raw_code_fallback);

            let extractor = BlobExtractor::from_config(&config.extraction).unwrap();
            assert_eq!(extractor.extract("<code>x = 1</code>").unwrap(), "x = 1");
        }
    }
}
