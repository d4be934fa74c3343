// POSIX shell quoting
// The only thing standing between a remote sub-command and the remote shell's
// parser. Every dynamic token sent through the remote-shell client goes here.

/// Quote `arg` so a POSIX shell reads it back as exactly one literal word.
///
/// Total over all inputs: the empty string becomes `''`, anything else is
/// wrapped in single quotes with each embedded `'` written as `'"'"'`.
pub fn quote_posix(arg: &str) -> String {
    if arg.is_empty() {
        return "''".to_string();
    }
    format!("'{}'", arg.replace('\'', "'\"'\"'"))
}

/// Quote every token and join with single spaces
pub fn join_posix<I, S>(tokens: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    tokens
        .into_iter()
        .map(|t| quote_posix(t.as_ref()))
        .collect::<Vec<_>>()
        .join(" ")
}
