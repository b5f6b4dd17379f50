pub mod error {
    use snafu::{AsErrorSource, ErrorCompat};
    use std::backtrace::BacktraceStatus;

    /// Print an error and each of its causes, one per line, to stderr.
    ///
    /// The backtrace is printed too when one was captured
    /// (`RUST_BACKTRACE=1`).
    pub fn show_snafu_error<E>(e: E)
    where
        E: ErrorCompat + AsErrorSource,
    {
        for (ic, c) in chain_lines(&e).iter().enumerate() {
            if ic == 0 {
                eprintln!("ERROR");
            }
            eprintln!("{ic:>4}: {c}");
        }
        if let Some(bt) = ErrorCompat::backtrace(&e) {
            if bt.status() == BacktraceStatus::Captured {
                eprintln!("BACKTRACE");
                eprintln!("{bt}");
            }
        }
    }

    /// The error chain as lines of text, outermost first
    pub fn chain_lines<E>(e: &E) -> Vec<String>
    where
        E: ErrorCompat + AsErrorSource,
    {
        ErrorCompat::iter_chain(e).map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_chain_lines() {
        let e = crate::config::Config::from_toml_file("testdata/no_such_config.toml").unwrap_err();
        let lines = chain_lines(&e);
        assert_eq!(lines[0], "cannot read config file testdata/no_such_config.toml");
        assert!(lines.len() >= 2);
    }
}
