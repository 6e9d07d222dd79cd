//! Filters that pipe source files through external compilers.
//!
//! A [`ProcessFilter`] is registered as a file filter and only touches files
//! whose extension matches; everything else passes through unchanged. The
//! source is written to the program's standard input and its standard output
//! becomes the new content.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use weld_core::{Compiler, FileFilter, FilterError};

/// Placeholder in arguments that expands to the directory of the source file.
pub const DIR_PLACEHOLDER: &str = "{dir}";

/// Runs `program` with `args`, feeding `stdin` and capturing standard output.
///
/// Non-empty input is terminated with a newline. A non-zero exit status
/// becomes [`FilterError::Process`] carrying the captured standard error.
pub fn run(
    program: &str,
    args: &[String],
    stdin: Option<&str>,
    cwd: Option<&Path>,
    env: &[(String, String)],
) -> Result<String, FilterError> {
    tracing::debug!(program, ?args, "running external filter");

    let mut command = Command::new(program);
    command
        .args(args)
        .stdin(if stdin.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        })
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    if let Some(cwd) = cwd {
        command.current_dir(cwd);
    }
    for (key, value) in env {
        command.env(key, value);
    }

    let spawn_err = |source| FilterError::Spawn {
        program: program.to_string(),
        source,
    };
    let mut child = command.spawn().map_err(spawn_err)?;

    // stdin is written from its own thread while stdout is drained here.
    let output = std::thread::scope(|scope| {
        if let (Some(input), Some(mut pipe)) = (stdin, child.stdin.take()) {
            scope.spawn(move || {
                let _ = pipe.write_all(input.as_bytes());
                if !input.is_empty() {
                    let _ = pipe.write_all(b"\n");
                }
            });
        }
        child.wait_with_output()
    })
    .map_err(spawn_err)?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        let code = output.status.code().unwrap_or(-1);
        tracing::warn!(program, code, "external filter failed");
        return Err(FilterError::Process {
            program: program.to_string(),
            code,
            stderr,
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// File filter that runs matching files through an external program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessFilter {
    program: String,
    args: Vec<String>,
    extension: Option<String>,
    cwd_from_file: bool,
    env: Vec<(String, String)>,
}

impl ProcessFilter {
    /// Creates a filter that runs `program` with `args` on every file.
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            extension: None,
            cwd_from_file: false,
            env: Vec::new(),
        }
    }

    /// Restricts the filter to files with the given extension
    /// (case-insensitive, without the dot).
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = Some(extension.into().trim_start_matches('.').to_string());
        self
    }

    /// Runs the program from the directory of the source file.
    pub fn with_cwd_from_file(mut self, enabled: bool) -> Self {
        self.cwd_from_file = enabled;
        self
    }

    /// Adds an environment variable for the child process.
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    /// `lessc -` on `.less` files.
    pub fn less(bin: impl Into<String>) -> Self {
        Self::new(bin, ["-"])
            .with_extension("less")
            .with_cwd_from_file(true)
    }

    /// `sass --stdin` on `.scss` files, with the file's directory on the
    /// load path.
    pub fn sass(bin: impl Into<String>) -> Self {
        Self::new(bin, ["--stdin", "--load-path", DIR_PLACEHOLDER]).with_extension("scss")
    }

    /// `stylus` on `.styl` files, optionally compressed and with plain CSS
    /// imports inlined.
    pub fn stylus(bin: impl Into<String>, compress: bool, include_css: bool) -> Self {
        let mut args = Vec::new();
        if compress {
            args.push("-c".to_string());
        }
        if include_css {
            args.push("--include-css".to_string());
        }
        args.push("-I".to_string());
        args.push(DIR_PLACEHOLDER.to_string());
        Self::new(bin, args).with_extension("styl")
    }

    /// `coffee -p -s` on `.coffee` files, optionally without the top-level
    /// function wrapper.
    pub fn coffee(bin: impl Into<String>, bare: bool) -> Self {
        let mut args = vec!["-p".to_string(), "-s".to_string()];
        if bare {
            args.push("-b".to_string());
        }
        Self::new(bin, args).with_extension("coffee")
    }

    /// Returns the program name.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Returns the configured arguments, before placeholder expansion.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Returns the extension filter, if any.
    pub fn extension(&self) -> Option<&str> {
        self.extension.as_deref()
    }

    /// Returns `true` if `file` should be processed.
    pub fn matches(&self, file: &Path) -> bool {
        match &self.extension {
            None => true,
            Some(wanted) => file
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case(wanted)),
        }
    }

    fn expanded_args(&self, dir: &Path) -> Vec<String> {
        let dir = dir.to_string_lossy();
        self.args
            .iter()
            .map(|arg| arg.replace(DIR_PLACEHOLDER, &dir))
            .collect()
    }
}

impl FileFilter for ProcessFilter {
    fn apply(
        &self,
        content: String,
        _compiler: &Compiler,
        file: &Path,
    ) -> Result<String, FilterError> {
        if !self.matches(file) {
            return Ok(content);
        }
        let dir = file
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        let cwd = self.cwd_from_file.then_some(dir);
        run(
            &self.program,
            &self.expanded_args(dir),
            Some(content.as_str()),
            cwd,
            &self.env,
        )
    }
}

/// File filter that compiles `.ts` files with `tsc`.
///
/// `tsc` cannot read from standard input, so the source file is compiled in
/// place into a temporary output file which is then read back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeScriptFilter {
    bin: String,
    target: String,
}

impl TypeScriptFilter {
    /// Creates a filter invoking the given `tsc` binary.
    pub fn new(bin: impl Into<String>) -> Self {
        Self {
            bin: bin.into(),
            target: "ES5".to_string(),
        }
    }

    /// Sets the `--target` passed to the compiler.
    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = target.into();
        self
    }

    /// Returns the compiler binary.
    pub fn bin(&self) -> &str {
        &self.bin
    }

    fn compile(&self, file: &Path) -> Result<String, FilterError> {
        let out_dir = tempfile::tempdir().map_err(|source| FilterError::Io {
            path: std::env::temp_dir(),
            source,
        })?;
        let out_file: PathBuf = out_dir.path().join("out.js");
        let args = vec![
            file.to_string_lossy().into_owned(),
            "--target".to_string(),
            self.target.clone(),
            "--outFile".to_string(),
            out_file.to_string_lossy().into_owned(),
        ];
        run(&self.bin, &args, None, None, &[])?;
        std::fs::read_to_string(&out_file).map_err(|source| FilterError::Io {
            path: out_file.clone(),
            source,
        })
    }
}

impl FileFilter for TypeScriptFilter {
    fn apply(
        &self,
        content: String,
        _compiler: &Compiler,
        file: &Path,
    ) -> Result<String, FilterError> {
        let is_ts = file
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("ts"));
        if !is_ts {
            return Ok(content);
        }
        self.compile(file)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use weld_core::{DefaultOutputNamingConvention, FileCollection};

    fn sh(script: &str) -> ProcessFilter {
        ProcessFilter::new("sh", ["-c".to_string(), script.to_string()])
    }

    fn compiler(dir: &Path) -> Compiler {
        Compiler::new(
            FileCollection::new(dir),
            DefaultOutputNamingConvention::css(),
            dir,
        )
        .unwrap()
    }

    #[test]
    fn run_pipes_stdin_to_stdout() {
        let out = run("cat", &[], Some("body {}"), None, &[]).unwrap();
        assert_eq!(out, "body {}\n");
    }

    #[test]
    fn run_empty_input_gets_no_newline() {
        let out = run("cat", &[], Some(""), None, &[]).unwrap();
        assert_eq!(out, "");
    }

    #[test]
    fn run_nonzero_exit_is_process_error() {
        let err = run(
            "sh",
            &["-c".to_string(), "echo broken >&2; exit 3".to_string()],
            None,
            None,
            &[],
        )
        .unwrap_err();
        match err {
            FilterError::Process {
                program,
                code,
                stderr,
            } => {
                assert_eq!(program, "sh");
                assert_eq!(code, 3);
                assert_eq!(stderr, "broken");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn run_missing_program_is_spawn_error() {
        let err = run("weld-no-such-program", &[], None, None, &[]).unwrap_err();
        assert!(matches!(err, FilterError::Spawn { .. }));
    }

    #[test]
    fn run_passes_env() {
        let env = vec![("WELD_TEST_VALUE".to_string(), "42".to_string())];
        let out = run(
            "sh",
            &["-c".to_string(), "printf %s \"$WELD_TEST_VALUE\"".to_string()],
            None,
            None,
            &env,
        )
        .unwrap();
        assert_eq!(out, "42");
    }

    #[test]
    fn skips_non_matching_extension() {
        let dir = tempfile::tempdir().unwrap();
        let compiler = compiler(dir.path());
        let filter = sh("exit 1").with_extension("less");

        let out = FileFilter::apply(
            &filter,
            "a {}".to_string(),
            &compiler,
            &dir.path().join("a.css"),
        )
        .unwrap();
        assert_eq!(out, "a {}");
    }

    #[test]
    fn matches_extension_case_insensitively() {
        let filter = ProcessFilter::less("lessc");
        assert!(filter.matches(Path::new("x/site.LESS")));
        assert!(!filter.matches(Path::new("x/site.css")));
        assert!(!filter.matches(Path::new("x/less")));
    }

    #[test]
    fn expands_dir_placeholder_and_cwd() {
        let dir = tempfile::tempdir().unwrap();
        let compiler = compiler(dir.path());
        let styles = dir.path().join("styles");
        std::fs::create_dir(&styles).unwrap();

        let filter = ProcessFilter::new(
            "sh",
            [
                "-c".to_string(),
                "printf '%s|%s' \"$1\" \"$(basename \"$(pwd)\")\"".to_string(),
                "sh".to_string(),
                DIR_PLACEHOLDER.to_string(),
            ],
        )
        .with_cwd_from_file(true);

        let file = styles.join("site.less");
        let out = FileFilter::apply(&filter, String::new(), &compiler, &file).unwrap();
        assert_eq!(out, format!("{}|styles", styles.display()));
    }

    #[test]
    fn transforms_matching_file() {
        let dir = tempfile::tempdir().unwrap();
        let compiler = compiler(dir.path());
        let filter = sh("tr a-z A-Z").with_extension("less");

        let out = FileFilter::apply(
            &filter,
            "a { color: red; }".to_string(),
            &compiler,
            &dir.path().join("a.less"),
        )
        .unwrap();
        assert_eq!(out, "A { COLOR: RED; }\n");
    }

    #[test]
    fn presets() {
        let less = ProcessFilter::less("lessc");
        assert_eq!(less.args(), ["-"]);
        assert_eq!(less.extension(), Some("less"));

        let coffee = ProcessFilter::coffee("coffee", true);
        assert_eq!(coffee.args(), ["-p", "-s", "-b"]);
        assert_eq!(coffee.extension(), Some("coffee"));

        let stylus = ProcessFilter::stylus("stylus", true, false);
        assert_eq!(stylus.args(), ["-c", "-I", DIR_PLACEHOLDER]);

        let sass = ProcessFilter::sass("sass");
        assert_eq!(sass.program(), "sass");
        assert_eq!(sass.extension(), Some("scss"));
    }

    #[test]
    fn typescript_skips_other_files() {
        let dir = tempfile::tempdir().unwrap();
        let compiler = compiler(dir.path());
        let filter = TypeScriptFilter::new("weld-no-such-tsc");
        let out = FileFilter::apply(
            &filter,
            "var a = 1;".to_string(),
            &compiler,
            &dir.path().join("a.js"),
        )
        .unwrap();
        assert_eq!(out, "var a = 1;");
    }

    #[test]
    fn typescript_missing_binary_fails() {
        let dir = tempfile::tempdir().unwrap();
        let compiler = compiler(dir.path());
        let filter = TypeScriptFilter::new("weld-no-such-tsc");
        let err = FileFilter::apply(
            &filter,
            String::new(),
            &compiler,
            &dir.path().join("a.ts"),
        )
        .unwrap_err();
        assert!(matches!(err, FilterError::Spawn { .. }));
    }
}
