use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

/// An `io::Write` sink that keeps its bytes around after the `Lox` that
/// wrote into it is dropped, so a test can inspect what `print` produced
/// without going through a subprocess (see `Lox::with_output`).
#[derive(Clone, Default)]
pub struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

impl SharedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> String {
        String::from_utf8(self.0.borrow().clone()).expect("program output to be valid utf8")
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Writes `source` to a uniquely named file under the system temp directory
/// so an ERR-mode test can exercise the real `lox` binary (exit code,
/// stderr) via `assert_cmd` without a checked-in fixture tree.
pub fn write_fixture(scope: &str, name: &str, source: &str) -> std::path::PathBuf {
    let dir = std::env::temp_dir().join("lox_test_fixtures").join(scope);
    std::fs::create_dir_all(&dir).expect("create temp fixture directory");
    let path = dir.join(format!("{name}.lox"));
    std::fs::write(&path, source).expect("write temp fixture file");
    path
}

/// Runs a snippet of Lox source through the library directly (`is OK`) and
/// asserts on its captured stdout, or shells out to the compiled `lox`
/// binary (`is ERR`) and asserts on its stderr and exit status. Mirrors the
/// two halves of the interpreter's own CLI surface: most behavior is
/// observable as `print` output, but compile/runtime errors and their exit
/// codes are only meaningful at the process boundary.
#[macro_export]
macro_rules! tests {
    ($name:ident in $scope:ident source: $src:expr, is OK $($expected:expr)*) => {
        #[test]
        fn $name() {
            use $crate::common::SharedBuffer;

            lox::error::reset_error();
            let buffer = SharedBuffer::new();
            let mut interpreter = lox::Lox::with_output(buffer.clone());
            interpreter.run($src);

            assert!(!lox::error::did_error(), "unexpected compile error in `{}`", stringify!($name));
            assert!(!lox::error::did_runtime_error(), "unexpected runtime error in `{}`", stringify!($name));

            let mut expected = vec![$($expected),*];
            let expected = match expected.len() {
                0 => String::new(),
                _ => {
                    expected.push("");
                    expected.join("\n")
                }
            };
            assert_eq!(expected, buffer.contents());
        }
    };

    ($name:ident in $scope:ident source: $src:expr, is ERR $($expected:expr)+) => {
        #[test]
        fn $name() {
            use assert_cmd::Command;

            let expected = vec![$($expected),+].join("\n");
            let path = $crate::common::write_fixture(stringify!($scope), stringify!($name), $src);

            Command::cargo_bin("lox")
                .unwrap()
                .arg("run")
                .arg(&path)
                .assert()
                .stderr(format!("{expected}\n"))
                .failure();
        }
    };
}
