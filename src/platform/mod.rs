pub mod io;
pub mod network;
