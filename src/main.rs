use connectfour_term::connectfour::model::BoardModel;
use connectfour_term::core::client::TurnClient;
use connectfour_term::core::dispatch::UiContext;
use connectfour_term::core::errors::AppError;
use connectfour_term::core::{config, logger};
use connectfour_term::view::console;
use connectfour_term::view::theme::Theme;

use clap::{value_t, App, Arg};
use log::info;
use std::sync::{Arc, Mutex};

fn build_cli() -> App<'static, 'static> {
    App::new(env!("CARGO_PKG_NAME"))
        .version(env!("CARGO_PKG_VERSION"))
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .arg(
            Arg::with_name("host")
                .help("Game server host")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::with_name("port")
                .help("Game server port")
                .required(true)
                .index(2),
        )
        .arg(
            Arg::with_name("config")
                .short("c")
                .long("config")
                .value_name("FILE")
                .help("Sets a custom config file")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("debug-file")
                .short("d")
                .long("debug-file")
                .value_name("Debug file")
                .help("Output debug to a file")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("v")
                .short("v")
                .multiple(true)
                .help("Sets the level of verbosity"),
        )
}

fn main() -> Result<(), AppError> {
    let matches = build_cli().get_matches();

    let host = matches.value_of("host").unwrap_or_default();
    let port = value_t!(matches, "port", u16).unwrap_or_else(|e| e.exit());

    logger::init_logger(
        matches.value_of("debug-file"),
        logger::get_logger_level_by_verbosity(matches.occurrences_of("v")),
    )?;

    let app_config = config::get_app_config(matches.value_of("config"))?;
    let theme = Theme::from_config(&app_config.theme)?;

    let (context, queue) = UiContext::current();
    let model = Arc::new(Mutex::new(BoardModel::new(app_config.board)));
    let mut client =
        TurnClient::new(model).with_connect_timeout(app_config.network.connect_timeout());

    client.connect(host, port)?;
    client.start_listener()?;

    info!(
        "playing on a {}x{} board against {}:{}",
        app_config.board.rows, app_config.board.columns, host, port
    );

    console::run(&mut client, context, queue, theme)
}
