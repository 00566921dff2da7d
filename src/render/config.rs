//! Deterministic rendering of a `RouterConfig` into the proxy's text configuration.
//!
//! The template is a first-class contract (§4.4): for a given model it must produce
//! byte-identical output across runs. Rather than pull in a template-engine
//! dependency for what is ordered substitution, conditionals, and ranges over a
//! handful of collections, this builds the document with `std::fmt::Write` into a
//! `String`. `write!`/`writeln!` into a `String` never fails, so the `unwrap()`s
//! below are not error handling, they're satisfying the `Result` the trait returns.

use std::fmt::Write as _;

use crate::model::{AppConfig, BuilderConfig, GzipConfig, RouterConfig, SslConfig, WhitelistMode};

/// Certificate/key paths baked into the proxy image, used for the default vhost when
/// no platform certificate is attached.
const DEFAULT_SELF_SIGNED_CERT: &str = "/etc/nginx/ssl/default.crt";
const DEFAULT_SELF_SIGNED_KEY: &str = "/etc/nginx/ssl/default.key";

/// Render `model` into the complete proxy configuration text.
pub fn render(model: &RouterConfig, ssl_dir: &str) -> String {
    let mut out = String::new();
    render_prologue(model, &mut out);
    render_events(model, &mut out);
    render_http_block(model, ssl_dir, &mut out);
    out
}

fn render_prologue(model: &RouterConfig, out: &mut String) {
    writeln!(out, "user nginx nginx;").unwrap();
    writeln!(out, "daemon off;").unwrap();
    writeln!(out, "pid /tmp/nginx.pid;").unwrap();
    writeln!(out, "worker_processes {};", model.worker_processes).unwrap();
    writeln!(out).unwrap();
}

fn render_events(model: &RouterConfig, out: &mut String) {
    writeln!(out, "events {{").unwrap();
    writeln!(out, "    worker_connections {};", model.max_worker_connections).unwrap();
    writeln!(out, "}}").unwrap();
    writeln!(out).unwrap();
}

fn render_http_block(model: &RouterConfig, ssl_dir: &str, out: &mut String) {
    writeln!(out, "http {{").unwrap();

    writeln!(out, "    sendfile on;").unwrap();
    writeln!(out, "    tcp_nopush on;").unwrap();
    writeln!(out, "    tcp_nodelay on;").unwrap();
    writeln!(out, "    types_hash_max_size 2048;").unwrap();
    writeln!(
        out,
        "    vhost_traffic_status_zone shared:vhost_traffic_status:{};",
        model.traffic_status_zone_size
    )
    .unwrap();
    writeln!(out, "    keepalive_timeout {};", model.default_timeout).unwrap();
    writeln!(
        out,
        "    server_names_hash_max_size {};",
        model.server_name_hash_max_size
    )
    .unwrap();
    writeln!(
        out,
        "    server_names_hash_bucket_size {};",
        model.server_name_hash_bucket_size
    )
    .unwrap();
    writeln!(out).unwrap();

    if model.gzip.enabled {
        render_gzip(&model.gzip, out);
    }

    writeln!(out, "    client_max_body_size {}m;", model.body_size).unwrap();
    writeln!(out).unwrap();

    for cidr in &model.proxy_real_ip_cidr {
        writeln!(out, "    set_real_ip_from {cidr};").unwrap();
    }
    writeln!(out, "    real_ip_recursive on;").unwrap();
    if model.use_proxy_protocol {
        writeln!(out, "    real_ip_header proxy_protocol;").unwrap();
    } else {
        writeln!(out, "    real_ip_header X-Forwarded-For;").unwrap();
    }
    writeln!(out).unwrap();

    if model.disable_server_tokens {
        writeln!(out, "    server_tokens off;").unwrap();
    }
    if model.request_ids {
        writeln!(out, "    add_header X-Request-Id $request_id always;").unwrap();
    }
    writeln!(out).unwrap();

    writeln!(out, "    log_format upstreaminfo '{}';", model.log_format).unwrap();
    writeln!(out, "    access_log /opt/nginx/logs/access.log upstreaminfo;").unwrap();
    writeln!(out, "    error_log  /opt/nginx/logs/error.log {};", model.error_log_level).unwrap();
    writeln!(out).unwrap();

    writeln!(out, "    map $http_upgrade $connection_upgrade {{").unwrap();
    writeln!(out, "        default upgrade;").unwrap();
    writeln!(out, "        '' close;").unwrap();
    writeln!(out, "    }}").unwrap();
    writeln!(out).unwrap();

    writeln!(out, "    map $http_x_forwarded_proto $forwarded_proto_last {{").unwrap();
    writeln!(out, "        default $http_x_forwarded_proto;").unwrap();
    writeln!(out, "        \"~^.*,\\s*([^,\\s]+)$\" $1;").unwrap();
    writeln!(out, "    }}").unwrap();
    writeln!(out, "    map $forwarded_proto_last $access_scheme {{").unwrap();
    writeln!(out, "        https https;").unwrap();
    writeln!(out, "        default $scheme;").unwrap();
    writeln!(out, "    }}").unwrap();
    writeln!(out).unwrap();

    writeln!(out, "    map $server_port $standard_server_port {{").unwrap();
    writeln!(out, "        default $server_port;").unwrap();
    writeln!(out, "        8080 80;").unwrap();
    writeln!(out, "        6443 443;").unwrap();
    writeln!(out, "    }}").unwrap();
    writeln!(out, "    map $http_x_forwarded_port $forwarded_port {{").unwrap();
    writeln!(out, "        default $http_x_forwarded_port;").unwrap();
    writeln!(out, "        '' $standard_server_port;").unwrap();
    writeln!(out, "    }}").unwrap();
    writeln!(out).unwrap();

    let enforce_https = model.ssl.enforce || model.ssl.hsts.enabled;

    if model.ssl.hsts.enabled {
        let sts_value = hsts_value(&model.ssl.hsts);
        writeln!(out, "    map $access_scheme $sts {{").unwrap();
        writeln!(out, "        default '';").unwrap();
        writeln!(out, "        https '{sts_value}';").unwrap();
        writeln!(out, "    }}").unwrap();
        writeln!(out).unwrap();
    }

    render_default_vhost(model, ssl_dir, out);
    render_healthcheck_vhost(out);

    for app in &model.app_configs {
        for domain in &app.domains {
            render_app_vhost(model, app, domain, ssl_dir, enforce_https, out);
        }
    }

    writeln!(out, "}}").unwrap();

    if let Some(builder) = &model.builder_config {
        writeln!(out).unwrap();
        render_stream_block(builder, out);
    }
}

fn render_gzip(gzip: &GzipConfig, out: &mut String) {
    writeln!(out, "    gzip on;").unwrap();
    writeln!(out, "    gzip_comp_level {};", gzip.comp_level).unwrap();
    writeln!(out, "    gzip_disable \"{}\";", gzip.disable).unwrap();
    writeln!(out, "    gzip_http_version {};", gzip.http_version).unwrap();
    writeln!(out, "    gzip_min_length {};", gzip.min_length).unwrap();
    writeln!(out, "    gzip_proxied {};", gzip.proxied).unwrap();
    writeln!(out, "    gzip_types {};", gzip.types).unwrap();
    writeln!(out, "    gzip_vary {};", gzip.vary).unwrap();
    writeln!(out).unwrap();
}

fn hsts_value(hsts: &crate::model::HstsConfig) -> String {
    let mut value = format!("max-age={}", hsts.max_age);
    if hsts.include_subdomains {
        value.push_str("; includeSubDomains");
    }
    if hsts.preload {
        value.push_str("; preload");
    }
    value
}

fn render_default_vhost(model: &RouterConfig, ssl_dir: &str, out: &mut String) {
    let (cert, key) = if model.platform_certificate.is_some() {
        (format!("{ssl_dir}/platform.crt"), format!("{ssl_dir}/platform.key"))
    } else {
        (DEFAULT_SELF_SIGNED_CERT.to_string(), DEFAULT_SELF_SIGNED_KEY.to_string())
    };

    writeln!(out, "    server {{").unwrap();
    let proxy_protocol = if model.use_proxy_protocol { " proxy_protocol" } else { "" };
    writeln!(out, "        listen 8080{proxy_protocol};").unwrap();
    let http2 = if model.http2 { " http2" } else { "" };
    writeln!(out, "        listen 6443 ssl{http2};").unwrap();
    writeln!(out, "        server_name _;").unwrap();
    writeln!(out, "        ssl_certificate {cert};").unwrap();
    writeln!(out, "        ssl_certificate_key {key};").unwrap();
    writeln!(out, "        location /healthz {{").unwrap();
    writeln!(out, "            return 200;").unwrap();
    writeln!(out, "        }}").unwrap();
    writeln!(out, "        location / {{").unwrap();
    writeln!(out, "            return 404;").unwrap();
    writeln!(out, "        }}").unwrap();
    writeln!(out, "    }}").unwrap();
    writeln!(out).unwrap();
}

fn render_healthcheck_vhost(out: &mut String) {
    writeln!(out, "    server {{").unwrap();
    writeln!(out, "        listen 9090;").unwrap();
    writeln!(out, "        server_name _;").unwrap();
    writeln!(out, "        allow 127.0.0.1;").unwrap();
    writeln!(out, "        deny all;").unwrap();
    writeln!(out, "        location /healthz {{").unwrap();
    writeln!(out, "            return 200;").unwrap();
    writeln!(out, "        }}").unwrap();
    writeln!(out, "        location /stats {{").unwrap();
    writeln!(out, "            vhost_traffic_status_display;").unwrap();
    writeln!(out, "            vhost_traffic_status_display_format json;").unwrap();
    writeln!(out, "        }}").unwrap();
    writeln!(out, "    }}").unwrap();
    writeln!(out).unwrap();
}

/// Domain-rewrite rule (invariant 2): FQDNs pass through unchanged, bare labels
/// become `<label>.<platform_domain>` when a platform domain is configured, and a
/// wildcard-capturing regex server-name otherwise.
pub fn server_name(domain: &str, platform_domain: &str) -> String {
    if domain.contains('.') {
        domain.to_string()
    } else if !platform_domain.is_empty() {
        format!("{domain}.{platform_domain}")
    } else {
        format!("^{domain}\\.(?<domain>.+)$")
    }
}

fn render_app_vhost(
    model: &RouterConfig,
    app: &AppConfig,
    domain: &str,
    ssl_dir: &str,
    enforce_https: bool,
    out: &mut String,
) {
    let name = server_name(domain, &model.platform_domain);
    let cert = app.certificates.get(domain).and_then(|c| c.as_ref());

    writeln!(out, "    server {{").unwrap();
    let proxy_protocol = if model.use_proxy_protocol { " proxy_protocol" } else { "" };
    writeln!(out, "        listen 8080{proxy_protocol};").unwrap();
    writeln!(out, "        server_name {name};").unwrap();
    writeln!(out, "        server_name_in_redirect off;").unwrap();
    writeln!(out, "        port_in_redirect off;").unwrap();

    let effective_ssl = app.ssl.as_ref().unwrap_or(&model.ssl);
    if cert.is_some() {
        let http2 = if model.http2 { " http2" } else { "" };
        writeln!(out, "        listen 6443 ssl{http2};").unwrap();
        render_ssl_stanza(effective_ssl, domain, ssl_dir, out);
    }

    render_whitelist_block(model, app, out);

    writeln!(out, "        vhost_traffic_status_filter_by_set_key {} application::*;", app.name).unwrap();
    writeln!(out).unwrap();

    if app.available {
        writeln!(out, "        location / {{").unwrap();
        writeln!(out, "            proxy_buffering off;").unwrap();
        writeln!(out, "            proxy_set_header Host $host;").unwrap();
        let forwarded_for = if model.use_proxy_protocol {
            "$proxy_protocol_addr"
        } else {
            "$proxy_add_x_forwarded_for"
        };
        writeln!(out, "            proxy_set_header X-Forwarded-For {forwarded_for};").unwrap();
        writeln!(out, "            proxy_set_header X-Forwarded-Proto $access_scheme;").unwrap();
        writeln!(out, "            proxy_set_header X-Forwarded-Port $forwarded_port;").unwrap();
        writeln!(out, "            proxy_redirect off;").unwrap();
        writeln!(out, "            proxy_connect_timeout {};", app.connect_timeout).unwrap();
        writeln!(out, "            proxy_send_timeout {};", app.tcp_timeout).unwrap();
        writeln!(out, "            proxy_read_timeout {};", app.tcp_timeout).unwrap();
        writeln!(out, "            proxy_http_version 1.1;").unwrap();
        writeln!(out, "            proxy_set_header Upgrade $http_upgrade;").unwrap();
        writeln!(out, "            proxy_set_header Connection $connection_upgrade;").unwrap();
        if model.ssl.hsts.enabled {
            writeln!(out, "            add_header Strict-Transport-Security $sts always;").unwrap();
        }
        if enforce_https {
            writeln!(out, "            if ($access_scheme != \"https\") {{").unwrap();
            writeln!(out, "                return 301 https://$host$request_uri;").unwrap();
            writeln!(out, "            }}").unwrap();
        }
        writeln!(out, "            proxy_pass http://{}:80;", app.service_ip).unwrap();
        writeln!(out, "        }}").unwrap();
    } else {
        writeln!(out, "        location / {{").unwrap();
        writeln!(out, "            return 503;").unwrap();
        writeln!(out, "        }}").unwrap();
    }

    writeln!(out, "    }}").unwrap();
    writeln!(out).unwrap();
}

fn render_ssl_stanza(ssl: &SslConfig, domain: &str, ssl_dir: &str, out: &mut String) {
    writeln!(out, "        ssl_protocols {};", ssl.protocols).unwrap();
    if !ssl.ciphers.is_empty() {
        writeln!(out, "        ssl_ciphers {};", ssl.ciphers).unwrap();
        writeln!(out, "        ssl_prefer_server_ciphers on;").unwrap();
    }
    writeln!(out, "        ssl_certificate {ssl_dir}/{domain}.crt;").unwrap();
    writeln!(out, "        ssl_certificate_key {ssl_dir}/{domain}.key;").unwrap();
    if !ssl.session_cache.is_empty() {
        writeln!(out, "        ssl_session_cache {};", ssl.session_cache).unwrap();
        writeln!(out, "        ssl_session_timeout {};", ssl.session_timeout).unwrap();
    }
    writeln!(
        out,
        "        ssl_session_tickets {};",
        if ssl.use_session_tickets { "on" } else { "off" }
    )
    .unwrap();
    writeln!(out, "        ssl_buffer_size {};", ssl.buffer_size).unwrap();
    if !ssl.dh_param.is_empty() {
        writeln!(out, "        ssl_dhparam {ssl_dir}/dhparam.pem;").unwrap();
    }
}

fn render_whitelist_block(model: &RouterConfig, app: &AppConfig, out: &mut String) {
    let should_render = model.enforce_whitelists || !app.whitelist.is_empty() || !model.default_whitelist.is_empty();
    if !should_render {
        return;
    }

    let use_default = app.whitelist.is_empty() || model.whitelist_mode == WhitelistMode::Extend;
    if use_default {
        for cidr in &model.default_whitelist {
            writeln!(out, "        allow {cidr};").unwrap();
        }
    }
    for cidr in &app.whitelist {
        writeln!(out, "        allow {cidr};").unwrap();
    }
    writeln!(out, "        deny all;").unwrap();
}

fn render_stream_block(builder: &BuilderConfig, out: &mut String) {
    writeln!(out, "stream {{").unwrap();
    writeln!(out, "    server {{").unwrap();
    writeln!(out, "        listen 2222;").unwrap();
    writeln!(out, "        proxy_connect_timeout {};", builder.connect_timeout).unwrap();
    writeln!(out, "        proxy_timeout {};", builder.tcp_timeout).unwrap();
    writeln!(out, "        proxy_pass {}:2222;", builder.service_ip).unwrap();
    writeln!(out, "    }}").unwrap();
    writeln!(out, "}}").unwrap();
}
