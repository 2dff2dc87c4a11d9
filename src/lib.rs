// Library root
// -----------
// This crate exposes a small library surface for the CLI. The binary
// (`main.rs`) is a thin shell over these modules.
//
// Module responsibilities:
// - `api`: the transfer client — multipart upload sessions with progress
//   reporting, and deletion by id or url.
// - `config`: the `~/.fbin.yml` endpoint/credentials file.
// - `error`: the client's error taxonomy.
// - `ui`: command flows and progress rendering for the CLI.
//
// Keeping this separation makes the client testable against a mock server
// without going through the binary.
pub mod api;
pub mod config;
pub mod error;
pub mod ui;
