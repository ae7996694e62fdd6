use tripwiz_core::{SortKey, SortOrder};

use super::*;

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["tripwiz"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

#[test]
fn help_is_answered_by_the_parser() {
    let err = Cli::try_parse_from(["tripwiz", "trips", "--help"]).unwrap_err();
    assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
}

#[test]
fn parses_trips_list_defaults() {
    let cli = Cli::try_parse_from(["tripwiz", "trips", "list"]).unwrap();
    let Some(Commands::Trips {
        command:
            TripsCommands::List {
                search,
                min_price,
                max_price,
                sort,
            },
    }) = cli.command
    else {
        panic!("expected trips list");
    };
    assert!(search.is_none());
    assert!(min_price.is_none());
    assert!(max_price.is_none());
    assert_eq!(sort, SortSpec::default());
}

#[test]
fn parses_trips_list_filters() {
    let cli = Cli::try_parse_from([
        "tripwiz",
        "trips",
        "list",
        "--search",
        "bali",
        "--min-price",
        "1000000",
        "--max-price",
        "5000000",
        "--sort",
        "price-asc",
    ])
    .unwrap();
    let Some(Commands::Trips {
        command:
            TripsCommands::List {
                search,
                min_price,
                max_price,
                sort,
            },
    }) = cli.command
    else {
        panic!("expected trips list");
    };
    let query = trip_query(search, min_price, max_price, sort);
    assert_eq!(query.search, "bali");
    assert_eq!(query.min_price, Some(1_000_000.0));
    assert_eq!(query.max_price, Some(5_000_000.0));
    assert_eq!(query.sort.key, SortKey::Price);
    assert_eq!(query.sort.order, SortOrder::Asc);
}

#[test]
fn rejects_unknown_sort() {
    let result = Cli::try_parse_from(["tripwiz", "trips", "list", "--sort", "rating-asc"]);
    assert!(result.is_err());
}

#[test]
fn parses_trips_edit() {
    let cli = Cli::try_parse_from(["tripwiz", "trips", "edit", "12"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Trips {
            command: TripsCommands::Edit { id: 12 }
        })
    ));
}

#[test]
fn parses_trips_create() {
    let cli = Cli::try_parse_from(["tripwiz", "trips", "create"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Trips {
            command: TripsCommands::Create
        })
    ));
}

#[test]
fn parses_auth_login_without_password() {
    let cli =
        Cli::try_parse_from(["tripwiz", "auth", "login", "--email", "ayu@example.com"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Auth {
            command: AuthCommands::Login { ref email, password: None }
        }) if email == "ayu@example.com"
    ));
}

#[test]
fn parses_preferences_assign() {
    let cli = Cli::try_parse_from(["tripwiz", "preferences", "assign", "1", "3"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Preferences {
            command: PreferencesCommands::Assign { ref ids }
        }) if ids == &[1, 3]
    ));
}

#[test]
fn preferences_assign_requires_ids() {
    assert!(Cli::try_parse_from(["tripwiz", "preferences", "assign"]).is_err());
}

#[test]
fn parses_images_upload_with_trip() {
    let cli = Cli::try_parse_from([
        "tripwiz", "images", "upload", "a.jpg", "b.png", "--trip", "4",
    ])
    .unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Images {
            command: ImagesCommands::Upload { ref paths, trip: Some(4) }
        }) if paths.len() == 2
    ));
}

#[test]
fn parses_images_upload_cover() {
    let cli = Cli::try_parse_from(["tripwiz", "images", "upload-cover", "cover.webp"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Images {
            command: ImagesCommands::UploadCover { .. }
        })
    ));
}
