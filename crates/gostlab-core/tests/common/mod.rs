pub mod form_server;
