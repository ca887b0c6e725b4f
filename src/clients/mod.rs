pub mod uazapi;
