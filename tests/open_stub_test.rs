//! Integration tests for OpenStub used directly as an injected Opener

use openstub::{
    CallCounts, Fallback, FileHandle, FileRef, OpenCall, OpenError, OpenStub, Opener, Scoped,
    StubFile,
};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::NamedTempFile;

const EXAMPLE_CONTENT: &str = "some example\nDATA\n123";

fn example_data_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/data/example_data.txt")
}

/// Code under test: reads a whole file through whatever opener it is given
fn load(opener: &dyn Opener, path: &str) -> Result<String, OpenError> {
    let file = Scoped::enter(opener.open(&OpenCall::path(path))?)?;
    Ok(file.read_to_string()?)
}

#[test]
fn test_raise_is_default_without_scope() {
    let stub = OpenStub::new();

    let err = stub.invoke("/path/to/file").unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.to_string(), "File /path/to/file not found in open stub");
}

#[test]
fn test_raise_through_injected_opener() {
    let stub = OpenStub::with_fallback(Fallback::Raise);

    let err = load(&stub, "/path/to/file").unwrap_err();
    assert!(matches!(err, OpenError::FileNotFound(ref p) if p == "/path/to/file"));
}

#[test]
fn test_set_read_data_with_scope() {
    let stub = OpenStub::new();
    stub.set_read_data("/path/to/file", "Some data\nin file").unwrap();

    assert_eq!(load(&stub, "/path/to/file").unwrap(), "Some data\nin file");
}

#[test]
fn test_set_read_data_without_scope() {
    let stub = OpenStub::new();
    let data = stub
        .set_read_data("/path/to/file", "Some data\nin file")
        .unwrap();

    let file = stub.invoke("/path/to/file").unwrap();
    assert_eq!(file.read_to_string().unwrap(), "Some data\nin file");
    assert_eq!(data.calls().read, 1);
    assert_eq!(data.calls().enter, 0);
}

#[test]
fn test_placeholder_is_shared_and_counts_scopes() {
    let stub = OpenStub::with_fallback(Fallback::Placeholder);

    let first = {
        let scoped = Scoped::enter(stub.invoke("/path/to/file").unwrap()).unwrap();
        scoped.handle().clone()
    };
    let second = {
        let scoped = Scoped::enter(stub.invoke("/path/to/file").unwrap()).unwrap();
        scoped.handle().clone()
    };

    assert!(Arc::ptr_eq(&first, &second));
    let saved = stub.lookup("/path/to/file").unwrap();
    assert_eq!(
        saved.call_counts(),
        Some(CallCounts {
            read: 0,
            write: 0,
            enter: 2,
            exit: 2,
        })
    );
}

#[test]
fn test_placeholder_records_writes() {
    let stub = OpenStub::with_fallback(Fallback::Placeholder);

    load_and_write(&stub, "/out.txt", b"QWE");
    load_and_write(&stub, "/out.txt", b"RTY");

    let placeholder = stub.lookup("/out.txt").unwrap();
    assert_eq!(placeholder.call_counts().unwrap().write, 2);
}

fn load_and_write(opener: &dyn Opener, path: &str, data: &[u8]) {
    let file = Scoped::enter(opener.open(&OpenCall::path(path).arg("w")).unwrap()).unwrap();
    file.write(data).unwrap();
}

#[test]
fn test_concrete_stub_exposes_written_data() {
    let stub = OpenStub::new();
    let out = Arc::new(StubFile::new());
    stub.register("/out.txt", out.clone()).unwrap();

    load_and_write(&stub, "/out.txt", b"QWERTY");

    assert_eq!(out.written(), b"QWERTY");
}

#[test]
fn test_delegate_reads_real_file() {
    let stub = OpenStub::with_fallback(Fallback::Delegate);
    let path = example_data_path();

    assert_eq!(load(&stub, &path.to_string_lossy()).unwrap(), EXAMPLE_CONTENT);
}

#[test]
fn test_delegate_missing_real_file_propagates_io_error() {
    let stub = OpenStub::with_fallback(Fallback::Delegate);

    let err = stub.invoke("/path/to/file").unwrap_err();
    match err {
        OpenError::Io(e) => assert_eq!(e.kind(), io::ErrorKind::NotFound),
        other => panic!("expected a real io error, got {other}"),
    }
}

#[test]
fn test_delegate_and_registered_object_together() {
    #[derive(Debug)]
    struct Custom;

    impl FileHandle for Custom {
        fn read(&self) -> io::Result<Vec<u8>> {
            Ok(b"read".to_vec())
        }

        fn write(&self, _buf: &[u8]) -> io::Result<usize> {
            Ok(0)
        }
    }

    let stub = OpenStub::with_fallback(Fallback::Delegate);
    stub.register("/path/to/file", Arc::new(Custom)).unwrap();

    let real = load(&stub, &example_data_path().to_string_lossy()).unwrap();
    let registered = load(&stub, "/path/to/file").unwrap();

    assert_eq!(real, EXAMPLE_CONTENT);
    assert_eq!(registered, "read");
}

#[test]
fn test_delegate_binary_mode_returns_bytes() {
    let stub = OpenStub::with_fallback(Fallback::Delegate);
    let call = OpenCall::path(example_data_path().to_string_lossy()).arg("rb");

    let file = stub.invoke(call).unwrap();
    assert_eq!(file.read().unwrap(), EXAMPLE_CONTENT.as_bytes());
}

#[test]
fn test_delegate_write_then_read_back() {
    let stub = OpenStub::with_fallback(Fallback::Delegate);
    let temp = NamedTempFile::new().unwrap();
    let path = temp.path().to_string_lossy().to_string();

    {
        let call = OpenCall::keyword(path.clone()).with_mode("w");
        let file = Scoped::enter(stub.invoke(call).unwrap()).unwrap();
        file.write(b"QWERTY").unwrap();
    }

    let file = Scoped::enter(stub.invoke(path.as_str()).unwrap()).unwrap();
    assert_eq!(file.read_to_string().unwrap(), "QWERTY");
}

#[test]
fn test_delegate_invalid_mode() {
    let stub = OpenStub::with_fallback(Fallback::Delegate);
    let call = OpenCall::path(example_data_path().to_string_lossy()).arg("rw");

    let err = stub.invoke(call).unwrap_err();
    assert!(matches!(err, OpenError::InvalidMode(ref m) if m == "rw"));
}

#[test]
fn test_fallback_change_takes_effect_on_next_call() {
    let stub = OpenStub::new();
    assert!(stub.invoke("/path/to/file").is_err());

    stub.set_fallback(Fallback::Placeholder);
    let placeholder = stub.invoke("/path/to/file").unwrap();

    stub.set_fallback(Fallback::Raise);
    let again = stub.invoke("/path/to/file").unwrap();
    assert!(Arc::ptr_eq(&placeholder, &again));
}

#[test]
fn test_invalid_fallback_fails_at_invocation() {
    let stub = OpenStub::new();
    stub.set_fallback("InvalidBehavior");

    let err = load(&stub, "/path/to/file").unwrap_err();
    assert!(err
        .to_string()
        .starts_with("InvalidBehavior is not a valid fallback policy"));
}

#[test]
fn test_keyword_path_and_missing_path() {
    let stub = OpenStub::new();
    let data = stub.set_read_data("/kw", "kw").unwrap();

    let file = stub.invoke(OpenCall::keyword("/kw").arg("r")).unwrap();
    let expected: FileRef = data;
    assert!(Arc::ptr_eq(&file, &expected));

    let err = stub.invoke(OpenCall::new().with_mode("r")).unwrap_err();
    assert!(matches!(err, OpenError::MissingPath));
}

#[test]
fn test_duplicate_registration_leaves_registry_unchanged() {
    let stub = OpenStub::new();
    let first = stub.set_read_data("/path/to/file", "ABC").unwrap();

    let err = stub.set_read_data("/path/to/file", "XYZ").unwrap_err();
    assert!(err
        .to_string()
        .starts_with("Path /path/to/file already registered with object"));

    assert_eq!(load(&stub, "/path/to/file").unwrap(), "ABC");
    assert_eq!(first.calls().read, 1);
    assert_eq!(stub.len(), 1);
}

#[test]
fn test_update_then_unregister() {
    let stub = OpenStub::new();
    stub.set_read_data("/path/to/file", "ABC").unwrap();
    stub.update("/path/to/file", Arc::new(StubFile::with_read_data("XYZ")));

    assert_eq!(load(&stub, "/path/to/file").unwrap(), "XYZ");

    stub.unregister("/path/to/file").unwrap();
    assert!(stub.lookup("/path/to/file").is_err());
    assert!(stub.is_empty());
}
