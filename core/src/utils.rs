/// Split a logical name into (base, extension) on the last dot of its final
/// path component. The extension keeps its leading dot. A leading dot on the
/// final component (`.bashrc`) is not an extension.
pub fn split_ext(name: &str) -> (&str, &str) {
    let file_start = name.rfind('/').map(|i| i + 1).unwrap_or(0);
    let file = &name[file_start..];
    let stem_start = file.len() - file.trim_start_matches('.').len();
    match file[stem_start..].rfind('.') {
        Some(dot) => name.split_at(file_start + stem_start + dot),
        None => (name, ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_ext_matches_last_suffix() {
        assert_eq!(split_ext("2024-01-01.log.gz"), ("2024-01-01.log", ".gz"));
        assert_eq!(split_ext("dir/hello.xz"), ("dir/hello", ".xz"));
        assert_eq!(split_ext("hello"), ("hello", ""));
        assert_eq!(split_ext("a.b/hello"), ("a.b/hello", ""));
        assert_eq!(split_ext(".bashrc"), (".bashrc", ""));
        assert_eq!(split_ext("dir/..hidden.gz"), ("dir/..hidden", ".gz"));
    }
}
