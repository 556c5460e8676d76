pub mod discovery;
pub mod error;
pub mod host;
pub mod host_string;
pub mod hostfxr;
pub mod native_string;
pub mod registry;
