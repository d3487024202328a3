mod client_canvas;
mod message;
mod rectangle_store;
mod types;

pub use client_canvas::*;
pub use message::*;
pub use rectangle_store::*;
pub use types::*;

pub extern crate chrono;
pub extern crate serde;
pub extern crate serde_json;
pub extern crate uuid;
