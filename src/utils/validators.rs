// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::net::IpAddr;
use thiserror::Error;
use tokio::net::lookup_host;
use url::Url;

/// URL 校验错误
#[derive(Error, Debug, PartialEq, Eq)]
pub enum UrlError {
    #[error("invalid url: {0}")]
    Malformed(String),

    #[error("unsupported url scheme: {0}")]
    UnsupportedScheme(String),

    #[error("url has no host")]
    MissingHost,

    #[error("could not resolve host: {0}")]
    Unresolvable(String),

    #[error("private network address is not allowed: {0}")]
    PrivateAddress(String),
}

/// 校验待爬取 URL：必须是带主机名的绝对 http/https URL
pub fn parse_crawl_url(url_str: &str) -> Result<Url, UrlError> {
    let url = Url::parse(url_str.trim()).map_err(|e| UrlError::Malformed(e.to_string()))?;
    match url.scheme() {
        "http" | "https" => {}
        other => return Err(UrlError::UnsupportedScheme(other.to_string())),
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingHost);
    }
    Ok(url)
}

/// 确认目标主机不指向私有网络 (防止 SSRF)
///
/// 检查解析后的所有 IP 是否为私有、环回、链路本地或组播地址
pub async fn ensure_public_host(url: &Url) -> Result<(), UrlError> {
    let host = url.host_str().ok_or(UrlError::MissingHost)?;

    if host.eq_ignore_ascii_case("localhost") {
        return Err(UrlError::PrivateAddress(host.to_string()));
    }

    let port = url.port_or_known_default().unwrap_or(80);
    // IPv6 literals keep their brackets in host_str()
    let addrs = lookup_host(format!("{}:{}", host, port))
        .await
        .map_err(|e| UrlError::Unresolvable(format!("{}: {}", host, e)))?;

    for addr in addrs {
        if is_private_ip(addr.ip()) {
            return Err(UrlError::PrivateAddress(addr.ip().to_string()));
        }
    }

    Ok(())
}

/// 解析 URL 并确认其主机不指向私有网络
pub async fn ensure_public_url(url_str: &str) -> Result<(), UrlError> {
    let url = parse_crawl_url(url_str)?;
    ensure_public_host(&url).await
}

fn is_private_ip(ip: IpAddr) -> bool {
    match ip {
        IpAddr::V4(ipv4) => {
            let octets = ipv4.octets();
            ipv4.is_private()
                || ipv4.is_loopback()
                || ipv4.is_link_local()
                || ipv4.is_multicast()
                || ipv4.is_unspecified()
                // 100.64.0.0/10 (carrier-grade NAT)
                || (octets[0] == 100 && (octets[1] & 0xc0) == 64)
        }
        IpAddr::V6(ipv6) => {
            if let Some(mapped) = ipv6.to_ipv4_mapped() {
                return is_private_ip(IpAddr::V4(mapped));
            }
            let first = ipv6.segments()[0];
            ipv6.is_loopback()
                || ipv6.is_unspecified()
                // Unique Local Address (fc00::/7)
                || (first & 0xfe00) == 0xfc00
                // Link-local (fe80::/10)
                || (first & 0xffc0) == 0xfe80
                // Multicast (ff00::/8)
                || (first & 0xff00) == 0xff00
        }
    }
}
