use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum DebuggerError {
    #[error("A view with key \"{0}\" is already registered")]
    DuplicateKey(String),
    #[error("Registry has already quit")]
    RegistryClosed,
    #[error("Unknown plugin type tag: {0}")]
    UnknownPluginKind(u32),
}
