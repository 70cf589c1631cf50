//! Runs the echo service over the loopback transport.
//!
//! Set `RUST_LOG=neobinder=trace` to watch objects being created, resolved,
//! dispatched, and torn down.

use std::sync::Arc;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;
use std::time::Duration;

use anyhow::Context;
use anyhow::Result;
use anyhow::bail;
use neobinder::Binder;
use neobinder::ClassDescriptor;
use neobinder::CreateArgs;
use neobinder::LoopbackTransport;
use neobinder::Parcel;
use neobinder::Runtime;
use neobinder::StatusCode;
use neobinder::UserData;
use tracing::info;
use tracing_subscriber::EnvFilter;

const ECHO: u32 = 7;
const COUNT: u32 = 8;

/// Per-object state of the echo service.
struct Echo {
    prefix: String,
    served: AtomicU64,
}

fn echo_class() -> Result<Arc<ClassDescriptor>> {
    let class = ClassDescriptor::define(
        "demo.IEcho",
        |args: CreateArgs| -> Option<UserData> {
            let prefix = args.downcast::<String>().map(|p| *p).unwrap_or_default();
            Some(Box::new(Echo { prefix, served: AtomicU64::new(0) }))
        },
        |data: Option<UserData>| {
            if let Some(echo) = data.and_then(|d| d.downcast::<Echo>().ok()) {
                info!(served = echo.served.load(Ordering::Relaxed), "echo service shutting down");
            }
        },
        |obj, code, data, reply, _flags| {
            let echo = obj.user_data_as::<Echo>().ok_or(StatusCode::UnexpectedNull)?;
            match code {
                ECHO => {
                    let text = data.reader().read_str()?;
                    echo.served.fetch_add(1, Ordering::Relaxed);
                    reply.write_str(&format!("{}{}", echo.prefix, text))
                }
                COUNT => {
                    let served = echo.served.load(Ordering::Relaxed);
                    reply.write_u32(u32::try_from(served).unwrap_or(u32::MAX));
                    Ok(())
                }
                _ => Err(StatusCode::UnknownTransaction),
            }
        },
    )?;
    Ok(class)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let class = echo_class().context("defining demo.IEcho")?;
    let transport = LoopbackTransport::new();

    let handle = {
        let service = Binder::new_local(&class, String::from("echo: "));
        transport.publish(&service)?
    };
    info!(%handle, "service published");

    let runtime = Runtime::builder(transport.clone())
        .call_timeout(Duration::from_secs(5))
        .build()?;

    let proxy = runtime.from_handle(handle);
    proxy.ping().await.context("pinging service")?;
    if !proxy.associate_verified(&class).await? {
        bail!("handle {handle} does not implement demo.IEcho");
    }

    for word in ["hello", "binder", "world"] {
        let mut data = Parcel::new();
        data.write_str(word)?;
        let reply = proxy.transact(ECHO, data, 0).await.context("echo call")?;
        println!("{}", reply.reader().read_str()?);
    }

    let reply = proxy.transact(COUNT, Parcel::new(), 0).await?;
    println!("served {} requests", reply.reader().read_u32()?);

    drop(proxy);
    transport.kill(handle);
    Ok(())
}
