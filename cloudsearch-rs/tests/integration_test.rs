//! Integration tests for the cloudsearch CLI.

use std::io::Write;
use std::process::Command;
use tempfile::NamedTempFile;

/// Write a settings file for one test.
fn settings_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{}", content).unwrap();
    file
}

/// Run the CLI against `config` and return stdout, stderr and the exit code.
fn run_cloudsearch(config: &NamedTempFile, args: &[&str]) -> (String, String, i32) {
    let binary = env!("CARGO_BIN_EXE_cloudsearch");

    let output = Command::new(binary)
        .arg("--config")
        .arg(config.path())
        .args(args)
        .env_remove("CLOUDSEARCH_ID")
        .env_remove("CLOUDSEARCH_API_VERSION")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute cloudsearch");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

mod url_command {
    use super::*;

    #[test]
    fn url_with_filters() {
        let config = settings_file("search_id = \"movies\"\n");
        let (stdout, _, code) = run_cloudsearch(
            &config,
            &[
                "url",
                "--keyword",
                "star wars",
                "--and",
                "genre=Sci-Fi",
                "--int",
                "year=1977..",
                "--rank",
                "-year",
            ],
        );
        assert_eq!(code, 0);
        assert!(stdout.contains(
            "http://search-movies/2011-02-01/search?q=star%20wars&bq=(and+genre%3A'Sci-Fi')+(or+year%3A1977..)&start=0&rank=-year"
        ));
    }

    #[test]
    fn url_includes_persistent_conditions() {
        let config = settings_file(
            r#"
search_id = "movies"
api_version = "2013-01-01"

[[persistent_conditions]]
kind = "text"
field = "tenant"
value = "acme"
"#,
        );
        let (stdout, _, code) = run_cloudsearch(&config, &["url", "--keyword", "alien"]);
        assert_eq!(code, 0);
        assert!(stdout.contains(
            "http://search-movies/2013-01-01/search?q=alien&bq=(and+tenant%3A'acme')&start=0"
        ));
    }

    #[test]
    fn domain_flag_overrides_config() {
        let config = settings_file("search_id = \"movies\"\n");
        let (stdout, _, code) =
            run_cloudsearch(&config, &["--domain", "books", "url", "--keyword", "dune"]);
        assert_eq!(code, 0);
        assert!(stdout.contains("http://search-books/"));
    }

    #[test]
    fn missing_domain_is_config_error() {
        let config = settings_file("");
        let (_, stderr, code) = run_cloudsearch(&config, &["url", "--keyword", "x"]);
        assert_eq!(code, 2);
        assert!(stderr.contains("No search domain configured"));
    }

    #[test]
    fn invalid_range_fails() {
        let config = settings_file("search_id = \"movies\"\n");
        let (_, stderr, code) = run_cloudsearch(&config, &["url", "--int", "year=.."]);
        assert_eq!(code, 1);
        assert!(stderr.contains("Invalid range"));
    }
}

mod config_command {
    use super::*;

    #[test]
    fn config_prints_effective_settings() {
        let config = settings_file("search_id = \"movies\"\nmax_batch_bytes = 2048\n");
        let (stdout, _, code) = run_cloudsearch(&config, &["--toml", "config"]);
        assert_eq!(code, 0);
        assert!(stdout.contains("search_id = \"movies\""));
        assert!(stdout.contains("max_batch_bytes = 2048"));
        assert!(stdout.contains("api_version = \"2011-02-01\""));
    }

    #[test]
    fn malformed_config_is_config_error() {
        let config = settings_file("search_id = [");
        let (_, _, code) = run_cloudsearch(&config, &["config"]);
        assert_eq!(code, 2);
    }
}
