//! Domain types shared by the catalog client, the gallery core and the CLI.

pub mod domain;
