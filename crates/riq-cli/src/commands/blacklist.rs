use std::io::Write;

use riq_api::{BlacklistApi, BlacklistListQuery, IncidentListQuery, MalwareQuery, TimeWindow};
use tracing::debug;

use crate::cli::{Command, IncidentListArgs, ListArgs, MalwareArgs, UrlArgs, WindowArgs};
use crate::client::{CliError, CliResult};
use crate::output::{Presentation, View, write_json, write_view};
use crate::validate::{validate_confidence, validate_filter};

pub(crate) async fn handle_lookup<A, W>(
    api: &A,
    args: &UrlArgs,
    presentation: Presentation,
    out: &mut W,
) -> CliResult<()>
where
    A: BlacklistApi + ?Sized,
    W: Write,
{
    let payload = api
        .get_blacklist_lookup(&args.url)
        .await
        .map_err(CliError::failure)?;
    if presentation.as_json {
        write_json(out, &payload)
    } else {
        write_view(out, &payload, View::Lookup, presentation.render_options())
    }
}

pub(crate) async fn handle_incident<A, W>(
    api: &A,
    args: &UrlArgs,
    presentation: Presentation,
    out: &mut W,
) -> CliResult<()>
where
    A: BlacklistApi + ?Sized,
    W: Write,
{
    let payload = api
        .get_blacklist_incident(&args.url)
        .await
        .map_err(CliError::failure)?;
    if presentation.as_json {
        write_json(out, &payload)
    } else {
        write_view(out, &payload, View::Incident, presentation.render_options())
    }
}

pub(crate) async fn handle_incident_list<A, W>(
    api: &A,
    args: &IncidentListArgs,
    presentation: Presentation,
    out: &mut W,
) -> CliResult<()>
where
    A: BlacklistApi + ?Sized,
    W: Write,
{
    let query = incident_list_query(args);
    let payload = api
        .get_blacklist_incident_list(&query)
        .await
        .map_err(CliError::failure)?;
    if presentation.as_json {
        write_json(out, &payload)
    } else {
        write_view(out, &payload, View::Incident, presentation.render_options())
    }
}

pub(crate) async fn handle_list<A, W>(
    api: &A,
    args: &ListArgs,
    presentation: Presentation,
    out: &mut W,
) -> CliResult<()>
where
    A: BlacklistApi + ?Sized,
    W: Write,
{
    let query = list_query(args)?;
    let payload = api
        .get_blacklist_list(&query)
        .await
        .map_err(CliError::failure)?;
    // Resource listings have no text view; only `--json` prints them.
    if presentation.as_json {
        write_json(out, &payload)?;
    } else {
        debug!("list payload received without --json; nothing to print");
    }
    Ok(())
}

pub(crate) async fn handle_malware<A, W>(
    api: &A,
    args: &MalwareArgs,
    presentation: Presentation,
    out: &mut W,
) -> CliResult<()>
where
    A: BlacklistApi + ?Sized,
    W: Write,
{
    let query = malware_query(args)?;
    let payload = api
        .get_blacklist_malware(&query)
        .await
        .map_err(CliError::failure)?;
    // Same as `list`: text output only exists for lookup and incident views.
    if presentation.as_json {
        write_json(out, &payload)?;
    } else {
        debug!("malware payload received without --json; nothing to print");
    }
    Ok(())
}

/// Run the argument checks of `command` without contacting the API.
pub(crate) fn validate_command(command: &Command) -> CliResult<()> {
    match command {
        Command::List(args) => list_query(args).map(drop),
        Command::Malware(args) => malware_query(args).map(drop),
        Command::Lookup(_) | Command::Incident(_) | Command::IncidentList(_) => Ok(()),
    }
}

const fn time_window(args: &WindowArgs) -> TimeWindow {
    TimeWindow {
        days: args.days,
        start: args.start,
        end: args.end,
    }
}

const fn incident_list_query(args: &IncidentListArgs) -> IncidentListQuery {
    IncidentListQuery {
        window: time_window(&args.window),
        all_workspace_crawls: args.all_workspace_crawls,
    }
}

fn list_query(args: &ListArgs) -> CliResult<BlacklistListQuery> {
    Ok(BlacklistListQuery {
        filter: validate_filter(args.filter.as_deref())?,
        window: time_window(&args.window),
    })
}

fn malware_query(args: &MalwareArgs) -> CliResult<MalwareQuery> {
    Ok(MalwareQuery {
        filter: validate_filter(args.filter.as_deref())?,
        confidence: validate_confidence(args.confidence.as_deref())?,
        window: time_window(&args.window),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use riq_api::{ApiError, BlacklistFilter, Confidence};
    use serde_json::json;

    use crate::client::parse_datetime;
    use crate::output::{RenderOptions, render};
    use crate::test_support::{StubApi, StubCall};

    fn window() -> WindowArgs {
        WindowArgs {
            days: 1,
            start: None,
            end: None,
        }
    }

    fn as_text(out: Vec<u8>) -> String {
        String::from_utf8(out).expect("utf8 output")
    }

    const JSON: Presentation = Presentation {
        oneline: false,
        short: false,
        as_json: true,
    };

    const TEXT: Presentation = Presentation {
        oneline: false,
        short: false,
        as_json: false,
    };

    #[tokio::test]
    async fn lookup_text_output_matches_renderer() {
        let payload = json!({"url": "http://example.com", "blacklisted": true});
        let api = StubApi::returning(payload.clone());
        let mut out = Vec::new();

        handle_lookup(
            &api,
            &UrlArgs {
                url: "http://example.com".to_string(),
            },
            TEXT,
            &mut out,
        )
        .await
        .expect("lookup succeeds");

        assert_eq!(
            as_text(out),
            format!(
                "{}\n",
                render(&payload, View::Lookup, RenderOptions::default())
            )
        );
        assert_eq!(
            api.calls(),
            vec![StubCall::Lookup("http://example.com".to_string())]
        );
    }

    #[tokio::test]
    async fn incident_json_output_is_indented_payload() {
        let api = StubApi::returning(json!({"incident": [{"url": "http://a/"}]}));
        let mut out = Vec::new();

        handle_incident(
            &api,
            &UrlArgs {
                url: "http://a/".to_string(),
            },
            JSON,
            &mut out,
        )
        .await
        .expect("incident succeeds");

        assert_eq!(
            as_text(out),
            "{\n    \"incident\": [\n        {\n            \"url\": \"http://a/\"\n        }\n    ]\n}\n"
        );
    }

    #[tokio::test]
    async fn incident_list_forwards_window_and_flag() {
        let api = StubApi::returning(json!({"incident": []}));
        let mut out = Vec::new();
        let args = IncidentListArgs {
            all_workspace_crawls: true,
            window: WindowArgs {
                days: 7,
                start: Some(parse_datetime("2024-01-01 00:00:00").expect("datetime")),
                end: None,
            },
        };

        handle_incident_list(&api, &args, TEXT, &mut out)
            .await
            .expect("incident list succeeds");

        assert_eq!(as_text(out), "No incidents found.\n");
        assert_eq!(
            api.calls(),
            vec![StubCall::IncidentList(IncidentListQuery {
                window: TimeWindow {
                    days: 7,
                    start: Some(parse_datetime("2024-01-01 00:00:00").expect("datetime")),
                    end: None,
                },
                all_workspace_crawls: true,
            })]
        );
    }

    #[tokio::test]
    async fn list_without_json_prints_nothing() {
        let api = StubApi::returning(json!([{"url": "http://a/"}]));
        let mut out = Vec::new();
        let args = ListArgs {
            filter: Some("sakura".to_string()),
            window: window(),
        };

        handle_list(&api, &args, TEXT, &mut out)
            .await
            .expect("list succeeds");

        assert!(out.is_empty());
        assert_eq!(
            api.calls(),
            vec![StubCall::List(BlacklistListQuery {
                filter: Some(BlacklistFilter::Sakura),
                window: TimeWindow::default(),
            })]
        );
    }

    #[tokio::test]
    async fn list_rejects_unknown_filter_before_calling_api() {
        let api = StubApi::returning(json!([]));
        let mut out = Vec::new();
        let args = ListArgs {
            filter: Some("badvalue".to_string()),
            window: window(),
        };

        let err = handle_list(&api, &args, JSON, &mut out)
            .await
            .expect_err("filter should be rejected");

        assert!(matches!(err, CliError::Validation(_)));
        assert!(api.calls().is_empty());
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn malware_validates_filter_and_confidence_before_calling_api() {
        let api = StubApi::returning(json!([]));
        for (filter, confidence) in [
            (Some("nope"), None),
            (None, Some("X")),
            (Some("blackhole"), Some("medium")),
        ] {
            let args = MalwareArgs {
                filter: filter.map(str::to_string),
                confidence: confidence.map(str::to_string),
                window: window(),
            };
            let mut out = Vec::new();
            let err = handle_malware(&api, &args, JSON, &mut out)
                .await
                .expect_err("arguments should be rejected");
            assert!(matches!(err, CliError::Validation(_)));
        }
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn malware_json_forwards_typed_query() {
        let api = StubApi::returning(json!({"resources": []}));
        let mut out = Vec::new();
        let args = MalwareArgs {
            filter: Some("exploitKit".to_string()),
            confidence: Some("H".to_string()),
            window: window(),
        };

        handle_malware(&api, &args, JSON, &mut out)
            .await
            .expect("malware succeeds");

        assert_eq!(as_text(out), "{\n    \"resources\": []\n}\n");
        assert_eq!(
            api.calls(),
            vec![StubCall::Malware(MalwareQuery {
                filter: Some(BlacklistFilter::ExploitKit),
                confidence: Some(Confidence::High),
                window: TimeWindow::default(),
            })]
        );
    }

    #[test]
    fn validate_command_checks_only_filtered_commands() {
        let list = |filter: &str| {
            Command::List(ListArgs {
                filter: Some(filter.to_string()),
                window: window(),
            })
        };
        assert!(validate_command(&list("sakura")).is_ok());
        assert!(matches!(
            validate_command(&list("nope")),
            Err(CliError::Validation(_))
        ));
        assert!(matches!(
            validate_command(&Command::Malware(MalwareArgs {
                filter: None,
                confidence: Some("X".to_string()),
                window: window(),
            })),
            Err(CliError::Validation(_))
        ));
        assert!(
            validate_command(&Command::Lookup(UrlArgs {
                url: "anything".to_string(),
            }))
            .is_ok()
        );
    }

    #[tokio::test]
    async fn api_failures_surface_as_cli_failures() {
        let api = StubApi::failing(ApiError::Status {
            endpoint: "blacklist/lookup",
            status: 500,
            body: String::new(),
        });
        let mut out = Vec::new();

        let err = handle_lookup(
            &api,
            &UrlArgs {
                url: "http://example.com".to_string(),
            },
            JSON,
            &mut out,
        )
        .await
        .expect_err("api error should propagate");

        assert!(matches!(err, CliError::Failure(_)));
        assert_eq!(
            err.display_message(),
            "request to blacklist/lookup returned status 500"
        );
        assert!(out.is_empty());
    }
}
