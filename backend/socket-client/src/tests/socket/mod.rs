mod close_code;
mod connection_state;
mod decoder;
mod dispatcher;
mod registry;
