/// Compile a regex literal once and hand out a `&'static Regex`.
///
/// Patterns in this crate are literals checked by the test suite, so a failed
/// compile is a programming error.
#[macro_export]
macro_rules! regex {
    ($pat:literal) => {{
        static RE: once_cell::sync::Lazy<regex::Regex> =
            once_cell::sync::Lazy::new(|| regex::Regex::new($pat).expect("invalid regex literal"));
        &*RE
    }};
}
