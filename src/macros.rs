// Compiles a pattern known to be valid at the call site
macro_rules! regex(
    ($s:expr) => (::regex::Regex::new($s).unwrap());
);
