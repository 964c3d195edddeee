mod boot;
mod config_file;
mod http;
