mod http;
mod shadowsocks;
mod socks;
mod trojan;
mod utils;
mod vless;
mod vmess;
