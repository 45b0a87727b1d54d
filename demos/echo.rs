//! Echo every frame back to the browser.
//!
//! ```text
//! RUST_LOG=debug cargo run --example echo -- 0.0.0.0:8080
//! ```
//!
//! ```js
//! const ws = new WebSocket("ws://127.0.0.1:8080/", "ro1");
//! ws.onmessage = (e) => console.log(e.data);
//! ws.onopen = () => ws.send("hello");
//! ```

use std::time::Duration;

use pollws::frame::OpCode;
use pollws::session::Callbacks;
use pollws::{Activity, Config, Session};

use log::info;

fn main() -> Result<(), pollws::Error> {
    env_logger::init();

    let addr = std::env::args().nth(1).unwrap_or_else(|| "127.0.0.1:8080".to_string());

    let callbacks = Callbacks::new()
        .on_connect(|link| {
            info!("client connected");
            let _ = link.send_text("welcome");
        })
        .on_data(|link, opcode, payload| {
            let ret = match opcode {
                OpCode::Text => link.send_text(&String::from_utf8_lossy(payload)),
                _ => link.send_binary(payload),
            };
            if let Err(e) = ret {
                info!("echo failed: {}", e);
            }
        })
        .on_disconnect(|_| info!("client disconnected"));

    let mut session: Session<_, _> = Session::bind(&addr, Config::default(), callbacks)?;
    info!("listening on {}", addr);

    loop {
        if let Activity::Idle = session.poll()? {
            std::thread::sleep(Duration::from_millis(1));
        }
    }
}
