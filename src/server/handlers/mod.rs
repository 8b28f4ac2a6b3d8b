pub mod share_download;
