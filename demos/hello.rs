#[macro_use]
extern crate slog;
#[macro_use]
extern crate trackable;

use clap::{Arg, Command};
use reqloggers::{Middleware, MiddlewareConfig, RequestContext};

fn main() {
    let matches = Command::new("hello")
        .about("Simulates requests going through the logger middleware")
        .arg(Arg::new("CONFIG_FILE").index(1).required(true))
        .arg(
            Arg::new("REQUESTS")
                .long("requests")
                .value_parser(clap::value_parser!(u32))
                .default_value("3"),
        )
        .get_matches();
    let config_file = matches
        .get_one::<String>("CONFIG_FILE")
        .expect("required argument");
    let requests = *matches.get_one::<u32>("REQUESTS").expect("has a default");

    let config: MiddlewareConfig = track_try_unwrap!(serdeconv::from_toml_file(config_file));
    let middleware = track_try_unwrap!(config.build_middleware());

    for id in 0..requests {
        let mut ctx = RequestContext::new();
        middleware.process_resource(&mut ctx);
        if let Some(log) = ctx.log() {
            debug!(log, "Request received"; "id" => id);
            info!(log, "Hello {:?}", id; "path" => "/hello");
        }
    }
    if let Err(e) = middleware.logger().flush() {
        eprintln!("flush failed: {}", e);
    }
}
