pub mod csv_export;
pub mod meraki_api;
pub mod replay_file;
