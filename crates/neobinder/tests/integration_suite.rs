//! End-to-end scenarios: a local echo service and proxy resolution over the
//! loopback transport.

use std::sync::Arc;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use neobinder::Binder;
use neobinder::ClassDescriptor;
use neobinder::FIRST_CALL_TRANSACTION;
use neobinder::LAST_CALL_TRANSACTION;
use neobinder::LoopbackTransport;
use neobinder::Parcel;
use neobinder::RemoteHandle;
use neobinder::Runtime;
use neobinder::StatusCode;

/// Defines `demo.IEcho`: code 7 succeeds, everything else fails with
/// `FailedTransaction`. Counts handler invocations in `calls`.
fn define_echo(calls: &Arc<AtomicUsize>) -> Arc<ClassDescriptor> {
    let calls = Arc::clone(calls);
    ClassDescriptor::define(
        "demo.IEcho",
        |_| None,
        |_| {},
        move |_, code, data, reply, _| {
            calls.fetch_add(1, Ordering::SeqCst);
            if code == 7 {
                reply.write_bytes(data.as_bytes());
                Ok(())
            } else {
                Err(StatusCode::FailedTransaction)
            }
        },
    )
    .expect("define demo.IEcho")
}

fn define_named(name: &str) -> Arc<ClassDescriptor> {
    ClassDescriptor::define(name, |_| None, |_| {}, |_, _, _, _, _| Ok(()))
        .expect("define class")
}

#[test]
fn test_echo_scenario_on_local_object() {
    let calls = Arc::new(AtomicUsize::new(0));
    let class = define_echo(&calls);
    let obj = Binder::new_local(&class, ());
    let local = obj.as_local().expect("local object");

    assert_eq!(local.interface_descriptor(), "demo.IEcho");

    let mut reply = Parcel::new();
    let result = local.on_transaction(7, &Parcel::new(), &mut reply, 0);
    assert_eq!(result, Ok(()));
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    let mut reply = Parcel::new();
    let result = local.on_transaction(FIRST_CALL_TRANSACTION - 1, &Parcel::new(), &mut reply, 0);
    assert_eq!(result, Err(StatusCode::UnknownTransaction));
    assert_eq!(calls.load(Ordering::SeqCst), 1, "handler must not run for reserved codes");

    let mut reply = Parcel::new();
    let result = local.on_transaction(LAST_CALL_TRANSACTION, &Parcel::new(), &mut reply, 0);
    assert_eq!(result, Err(StatusCode::FailedTransaction));
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn test_handle_resolution_scenario() {
    let runtime = Runtime::new(LoopbackTransport::new());
    let h1 = RemoteHandle(1);

    let p1 = runtime.from_handle(h1);
    let p2 = runtime.from_handle(h1);
    assert_eq!(p1, p2, "same handle must resolve to the same proxy");

    let echo = define_named("demo.IEcho");
    let other = define_named("demo.IOther");

    assert!(p1.associate_class(&echo));
    assert!(!p2.associate_class(&other));
    assert_eq!(
        p1.associated_class().map(|c| c.interface_descriptor()),
        Some("demo.IEcho")
    );
}

#[tokio::test]
async fn test_echo_across_the_loopback() {
    let calls = Arc::new(AtomicUsize::new(0));
    let class = define_echo(&calls);

    // "Server" side: host the object.
    let transport = LoopbackTransport::new();
    let handle = {
        let service = Binder::new_local(&class, ());
        transport.publish(&service).expect("publish")
    };

    // "Client" side: resolve, verify, call.
    let runtime = Runtime::new(transport.clone());
    let proxy = runtime.from_handle(handle);
    assert!(proxy.is_remote());
    assert!(proxy.associate_verified(&class).await.expect("query interface"));

    let mut data = Parcel::new();
    data.write_str("ping?").unwrap();
    let reply = proxy.transact(7, data, 0).await.expect("echo");
    assert_eq!(reply.reader().read_str().unwrap(), "ping?");

    let err = proxy.transact(8, Parcel::new(), 0).await.unwrap_err();
    assert_eq!(err, StatusCode::FailedTransaction);
    assert_eq!(calls.load(Ordering::SeqCst), 2);

    drop(proxy);
    assert_eq!(runtime.live_proxies(), 0);
    assert_eq!(transport.refs(handle).outstanding(), 0);
}

#[tokio::test]
async fn test_many_tasks_share_one_proxy() {
    let calls = Arc::new(AtomicUsize::new(0));
    let class = define_echo(&calls);
    let transport = LoopbackTransport::new();
    let service = Binder::new_local(&class, ());
    let handle = transport.publish(&service).expect("publish");
    let runtime = Runtime::new(transport.clone());

    let mut tasks = Vec::new();
    for i in 0..16u32 {
        let runtime = runtime.clone();
        let class = Arc::clone(&class);
        tasks.push(tokio::spawn(async move {
            let proxy = runtime.from_handle(handle);
            assert!(proxy.associate_class(&class));
            let mut data = Parcel::new();
            data.write_u32(i);
            let reply = proxy.transact(7, data, 0).await.expect("echo");
            assert_eq!(reply.reader().read_u32().unwrap(), i);
            proxy
        }));
    }

    let mut proxies = Vec::new();
    for task in tasks {
        proxies.push(task.await.expect("task"));
    }

    assert!(proxies.windows(2).all(|w| w[0] == w[1]));
    assert_eq!(transport.refs(handle).acquired, 1);
    assert_eq!(calls.load(Ordering::SeqCst), 16);
}
