// src/pac/engine.rs
use super::temporal::TemporalArg;
use super::PacFunctions;
use crate::context::PacContext;
use crate::error::{PacError, Result};
use boa_engine::{
    js_string, Context, JsNativeError, JsResult, JsString, JsValue, NativeFunction, Source,
};
use boa_gc::{Finalize, Trace};
use std::sync::Arc;
use tracing::{debug, info, warn};
use url::Url;

/// A PAC script plus the primitives it is evaluated against.
#[derive(Debug, Clone)]
pub struct PacScript {
    source: String,
    functions: Arc<PacFunctions>,
}

impl PacScript {
    pub fn new(source: impl Into<String>, functions: PacFunctions) -> Self {
        Self {
            source: source.into(),
            functions: Arc::new(functions),
        }
    }

    /// Run `FindProxyForURL(url, host)` and return its answer verbatim,
    /// e.g. `"PROXY proxy.corp:3128; DIRECT"`.
    ///
    /// Every call evaluates the script in a fresh engine context.
    pub fn find_proxy(&self, target_url: &str) -> Result<String> {
        let url_obj = Url::parse(target_url).map_err(|source| PacError::InvalidUrl {
            url: target_url.to_string(),
            source,
        })?;
        let host = url_obj
            .host_str()
            .ok_or_else(|| PacError::MissingHost(target_url.to_string()))?;

        let answer = execute_pac_script(&self.source, &self.functions, target_url, host)
            .map_err(|e| PacError::Script(e.to_string()))?;
        debug!("FindProxyForURL({}, {}) = {:?}", target_url, host, answer);
        Ok(answer)
    }
}

/// Evaluate `script` for `target_url` against the live system and return the
/// first usable proxy as a URL (`DIRECT`, `http://host:port`, ...).
pub fn find_proxy_for_url(script: &str, target_url: &str) -> Result<String> {
    let pac = PacScript::new(script, PacFunctions::new(PacContext::system()));
    let raw_result = pac.find_proxy(target_url)?;
    let normalized = normalize_pac_result(&raw_result);
    info!("PAC resolved proxy for {}: {}", target_url, normalized);
    Ok(normalized)
}

fn execute_pac_script(
    script: &str,
    functions: &Arc<PacFunctions>,
    url: &str,
    host: &str,
) -> JsResult<String> {
    let mut context = Context::default();

    register_pac_functions(&mut context, Arc::clone(functions))?;

    context.eval(Source::from_bytes(script.as_bytes()))?;

    let global = context.global_object();
    let func_val = global.get(js_string!("FindProxyForURL"), &mut context)?;

    let func = func_val
        .as_callable()
        .ok_or_else(|| JsNativeError::typ().with_message("FindProxyForURL is not a function"))?;

    let args = [
        JsValue::from(js_string!(url)),
        JsValue::from(js_string!(host)),
    ];

    let result = func.call(&JsValue::undefined(), &args, &mut context)?;
    let js_str: JsString = result.to_string(&mut context)?;

    Ok(js_str.to_std_string_escaped())
}

/// `ToString` of argument `index`; a missing argument reads as `""`.
fn string_arg(args: &[JsValue], index: usize, ctx: &mut Context) -> JsResult<String> {
    match args.get(index) {
        Some(value) => Ok(value.to_string(ctx)?.to_std_string_escaped()),
        None => Ok(String::new()),
    }
}

// Integral numbers stay numbers; anything else is handed over as its
// JavaScript string form so `14.5` still compares as 14.5.
fn temporal_args(args: &[JsValue], ctx: &mut Context) -> JsResult<Vec<TemporalArg>> {
    args.iter()
        .map(|value| -> JsResult<TemporalArg> {
            match value.as_number() {
                Some(n) if n.is_finite() && n.fract() == 0.0 => Ok(TemporalArg::Int(n as i64)),
                _ => Ok(TemporalArg::Text(
                    value.to_string(ctx)?.to_std_string_escaped(),
                )),
            }
        })
        .collect()
}

#[derive(Trace, Finalize)]
struct Captures {
    #[unsafe_ignore_trace]
    functions: Arc<PacFunctions>,
}

fn register<F>(
    context: &mut Context,
    name: &str,
    length: usize,
    functions: &Arc<PacFunctions>,
    body: F,
) -> JsResult<()>
where
    F: Fn(&PacFunctions, &[JsValue], &mut Context) -> JsResult<JsValue> + Copy + 'static,
{
    let captures = Captures {
        functions: Arc::clone(functions),
    };
    let native = NativeFunction::from_copy_closure_with_captures(
        move |_this, args, captures: &Captures, ctx| body(&captures.functions, args, ctx),
        captures,
    );
    context.register_global_callable(JsString::from(name), length, native)
}

/// Install the Netscape PAC primitives as globals of `context`.
pub fn register_pac_functions(
    context: &mut Context,
    functions: Arc<PacFunctions>,
) -> JsResult<()> {
    let f = &functions;

    register(context, "isPlainHostName", 1, f, |pac, args, ctx| {
        Ok(pac.is_plain_host_name(&string_arg(args, 0, ctx)?).into())
    })?;

    register(context, "dnsDomainIs", 2, f, |pac, args, ctx| {
        Ok(pac
            .dns_domain_is(&string_arg(args, 0, ctx)?, &string_arg(args, 1, ctx)?)
            .into())
    })?;

    register(context, "localHostOrDomainIs", 2, f, |pac, args, ctx| {
        Ok(pac
            .local_host_or_domain_is(&string_arg(args, 0, ctx)?, &string_arg(args, 1, ctx)?)
            .into())
    })?;

    register(context, "dnsDomainLevels", 1, f, |pac, args, ctx| {
        let levels = pac.dns_domain_levels(&string_arg(args, 0, ctx)?);
        Ok(JsValue::from(i32::try_from(levels).unwrap_or(i32::MAX)))
    })?;

    register(context, "isResolvable", 1, f, |pac, args, ctx| {
        Ok(pac.is_resolvable(&string_arg(args, 0, ctx)?).into())
    })?;

    register(context, "dnsResolve", 1, f, |pac, args, ctx| {
        let ip = pac.dns_resolve(&string_arg(args, 0, ctx)?);
        Ok(JsString::from(ip.as_str()).into())
    })?;

    register(context, "isInNet", 3, f, |pac, args, ctx| {
        Ok(pac
            .is_in_net(
                &string_arg(args, 0, ctx)?,
                &string_arg(args, 1, ctx)?,
                &string_arg(args, 2, ctx)?,
            )
            .into())
    })?;

    // undefined, not "", when the machine has no usable address
    register(context, "myIpAddress", 0, f, |pac, _args, _ctx| {
        Ok(match pac.my_ip_address() {
            Some(ip) => JsString::from(ip.to_string().as_str()).into(),
            None => JsValue::undefined(),
        })
    })?;

    register(context, "shExpMatch", 2, f, |pac, args, ctx| {
        Ok(pac
            .sh_exp_match(&string_arg(args, 0, ctx)?, &string_arg(args, 1, ctx)?)
            .into())
    })?;

    register(context, "weekdayRange", 3, f, |pac, args, ctx| {
        Ok(pac.weekday_range(&temporal_args(args, ctx)?).into())
    })?;

    register(context, "dateRange", 7, f, |pac, args, ctx| {
        Ok(pac.date_range(&temporal_args(args, ctx)?).into())
    })?;

    register(context, "timeRange", 7, f, |pac, args, ctx| {
        match pac.time_range(&temporal_args(args, ctx)?) {
            Ok(matched) => Ok(matched.into()),
            Err(e) => Err(JsNativeError::error().with_message(e.to_string()).into()),
        }
    })?;

    register(context, "alert", 1, f, |_pac, args, ctx| {
        info!("PAC alert: {}", string_arg(args, 0, ctx)?);
        Ok(JsValue::undefined())
    })?;

    Ok(())
}

/// Reduce a PAC answer such as `"PROXY a:3128; SOCKS b:1080; DIRECT"` to the
/// URL of its first usable entry.
pub fn normalize_pac_result(raw: &str) -> String {
    for part in raw.split(';').map(str::trim).filter(|p| !p.is_empty()) {
        let mut words = part.split_whitespace();
        let kind = words.next().unwrap_or_default().to_ascii_uppercase();
        match (kind.as_str(), words.next()) {
            ("DIRECT", _) => return "DIRECT".to_string(),
            ("PROXY" | "HTTP", Some(target)) => return format!("http://{}", target),
            ("HTTPS", Some(target)) => return format!("https://{}", target),
            ("SOCKS" | "SOCKS5", Some(target)) => return format!("socks5://{}", target),
            ("SOCKS4", Some(target)) => return format!("socks4://{}", target),
            _ => warn!("Ignoring malformed PAC entry {:?}", part),
        }
    }

    warn!("PAC returned no valid proxy, falling back to DIRECT");
    "DIRECT".to_string()
}
