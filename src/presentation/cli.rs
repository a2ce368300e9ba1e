use crate::application::parsers::raw_request::RawRequestParser;
use crate::application::services::{HttpRequestService, resolve_named_request};
use crate::application::variables::{Environment, ProcessEnvironment};
use crate::domain::entities::Request;
use crate::domain::errors::LookupError;
use crate::infrastructure::config::ConfigLoader;
use crate::infrastructure::editor::ExternalEditor;
use crate::infrastructure::output;
use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use std::path::PathBuf;

/// CLI configuration for Courier
#[derive(Parser, Debug)]
#[command(name = "courier", version)]
#[command(about = "Courier: run named HTTP requests from a workspace file", long_about = None)]
pub struct Cli {
    /// Workspace request to run; omit it to write a raw request in your editor
    pub request: Option<String>,

    /// Values for `args` variables, by position; everything after the
    /// request name is taken verbatim, so options go before it
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,

    /// Workspace file, defaults to courier.yaml / courier.yml / courier.json
    #[arg(short = 'f', long = "file")]
    pub file: Option<PathBuf>,

    /// Write the request as raw HTTP in $EDITOR. Header lines take a single
    /// colon, so use an absolute URL like `GET http://host:8080/path` to
    /// reach a non-default port
    #[arg(short, long)]
    pub interactive: bool,

    /// Print the request and response heads to stderr
    #[arg(short, long)]
    pub verbose: bool,

    /// List the workspace's requests
    #[arg(short, long)]
    pub list: bool,

    /// Save the response body to a file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Editor command for interactive mode, overrides $EDITOR
    #[arg(long)]
    pub editor: Option<String>,

    /// Pretty-print JSON response bodies
    #[arg(long)]
    pub pretty: bool,
}

/// What a single invocation does
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunMode {
    Named { request: String, args: Vec<String> },
    Interactive,
    List,
}

/// Settings for one run, built once from the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    pub mode: RunMode,
    pub config_file: Option<PathBuf>,
    pub verbose: bool,
    pub output: Option<PathBuf>,
    pub pretty: bool,
    pub editor: Option<String>,
}

impl Cli {
    pub fn options(&self) -> RunOptions {
        let mode = match (&self.request, self.list, self.interactive) {
            (_, true, _) => RunMode::List,
            (None, _, _) | (_, _, true) => RunMode::Interactive,
            (Some(request), false, false) => RunMode::Named {
                request: request.clone(),
                args: self.args.clone(),
            },
        };

        RunOptions {
            mode,
            config_file: self.file.clone(),
            verbose: self.verbose,
            output: self.output.clone(),
            pretty: self.pretty,
            editor: self.editor.clone(),
        }
    }

    pub async fn run(&self, request_service: &HttpRequestService) -> Result<()> {
        execute(&self.options(), request_service, &ProcessEnvironment).await
    }
}

/// Runs one invocation against the given service and environment
pub async fn execute(
    options: &RunOptions,
    request_service: &HttpRequestService,
    env: &dyn Environment,
) -> Result<()> {
    let loader = ConfigLoader::from_current_dir();

    match &options.mode {
        RunMode::List => {
            let workspace = loader.load(options.config_file.as_deref())?;
            for name in workspace.request_names() {
                println!("{}", name);
            }
            Ok(())
        }
        RunMode::Interactive => {
            let editor = ExternalEditor::resolve(options.editor.as_deref(), env);
            let text = editor.edit("").await?;
            let request = RawRequestParser::parse(&text)?;
            send_and_print(request, options, request_service).await
        }
        RunMode::Named { request, args } => {
            let workspace = loader.load(options.config_file.as_deref())?;
            let request = match resolve_named_request(&workspace, request, args, env) {
                Ok(request) => request,
                Err(err) => {
                    if let Some(lookup) = err.downcast_ref::<LookupError>() {
                        report_available(lookup);
                    }
                    return Err(err);
                }
            };
            send_and_print(request, options, request_service).await
        }
    }
}

fn report_available(lookup: &LookupError) {
    if lookup.available.is_empty() {
        eprintln!("{}", "The workspace declares no requests.".yellow());
    } else {
        eprintln!(
            "{} {}",
            "Available requests:".yellow(),
            lookup.available.join(", ")
        );
    }
}

async fn send_and_print(
    request: Request,
    options: &RunOptions,
    request_service: &HttpRequestService,
) -> Result<()> {
    if options.verbose {
        output::print_request_log(&request);
    }

    let response = request_service.send_request(request).await?;

    match &options.output {
        Some(path) => {
            std::fs::write(path, response.body.as_bytes())?;
            if options.verbose {
                eprintln!("Saved response to {}", path.display());
            }
        }
        None => output::print_response_body(&response.body, options.pretty)?,
    }

    if options.verbose {
        output::print_response_log(&response);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::MockHttpClient;
    use crate::domain::entities::{Method, Response};
    use crate::domain::value_objects::{Body, HeaderList};
    use hyper::StatusCode;
    use std::collections::HashMap;
    use tempfile::TempDir;

    const WORKSPACE: &str = r#"
vars:
  host:
    source: plain
    value: http://api.local
  token:
    source: process
    name: COURIER_TEST_TOKEN
    value: anonymous
  id:
    source: args
    index: 0
defaults:
  headers:
    Authorization: "Bearer {{token}}"
  query:
    format: json
requests:
  get-user:
    route: "{{host}}/users/{{id}}"
    headers:
      Authorization: "Extra {{token}}"
"#;

    fn options(mode: RunMode, dir: &TempDir) -> RunOptions {
        let config = dir.path().join("courier.yaml");
        std::fs::write(&config, WORKSPACE).unwrap();
        RunOptions {
            mode,
            config_file: Some(config),
            verbose: false,
            output: Some(dir.path().join("body.out")),
            pretty: false,
            editor: None,
        }
    }

    #[test]
    fn request_name_selects_named_mode() {
        let cli = Cli::parse_from(["courier", "-f", "api.yaml", "get-user", "42", "x"]);
        let options = cli.options();
        assert_eq!(
            options.mode,
            RunMode::Named {
                request: "get-user".to_string(),
                args: vec!["42".to_string(), "x".to_string()],
            }
        );
        assert_eq!(options.config_file, Some(PathBuf::from("api.yaml")));
    }

    #[test]
    fn hyphenated_args_are_passed_through() {
        let cli = Cli::try_parse_from(["courier", "search", "-5", "--sort=desc"]).unwrap();
        assert_eq!(
            cli.options().mode,
            RunMode::Named {
                request: "search".to_string(),
                args: vec!["-5".to_string(), "--sort=desc".to_string()],
            }
        );
    }

    #[test]
    fn options_after_request_name_are_args() {
        let cli = Cli::try_parse_from(["courier", "get-user", "42", "-v"]).unwrap();
        let options = cli.options();
        assert!(!options.verbose);
        assert_eq!(
            options.mode,
            RunMode::Named {
                request: "get-user".to_string(),
                args: vec!["42".to_string(), "-v".to_string()],
            }
        );
    }

    #[test]
    fn missing_request_or_flag_selects_interactive_mode() {
        assert_eq!(Cli::parse_from(["courier"]).options().mode, RunMode::Interactive);
        assert_eq!(
            Cli::parse_from(["courier", "-i", "get-user"]).options().mode,
            RunMode::Interactive
        );
    }

    #[test]
    fn list_flag_wins() {
        assert_eq!(
            Cli::parse_from(["courier", "-l", "-i", "get-user"]).options().mode,
            RunMode::List
        );
    }

    #[test]
    fn flags_parse() {
        let cli = Cli::parse_from([
            "courier",
            "-v",
            "--pretty",
            "--editor",
            "nano",
            "-o",
            "out.json",
            "ping",
        ]);
        let options = cli.options();
        assert!(options.verbose);
        assert!(options.pretty);
        assert_eq!(options.editor.as_deref(), Some("nano"));
        assert_eq!(options.output, Some(PathBuf::from("out.json")));
    }

    #[tokio::test]
    async fn named_request_is_assembled_sent_and_saved() {
        let dir = TempDir::new().unwrap();
        let options = options(
            RunMode::Named {
                request: "get-user".to_string(),
                args: vec!["42".to_string()],
            },
            &dir,
        );

        let mut client = MockHttpClient::new();
        client
            .expect_send()
            .withf(|request: &Request| {
                let auth: Vec<&str> = request.headers.get_all("Authorization").collect();
                request.method == Method::Get
                    && request.url.as_str() == "http://api.local/users/42?format=json"
                    && auth == vec!["Bearer secret", "Extra secret"]
            })
            .times(1)
            .returning(|_| {
                Ok(Response {
                    status: StatusCode::OK,
                    headers: HeaderList::new(),
                    body: Body::from("{\"id\":42}"),
                })
            });
        let service = HttpRequestService::new(Box::new(client));
        let env: HashMap<String, String> =
            [("COURIER_TEST_TOKEN".to_string(), "secret".to_string())].into();

        execute(&options, &service, &env).await.unwrap();

        let saved = std::fs::read_to_string(dir.path().join("body.out")).unwrap();
        assert_eq!(saved, "{\"id\":42}");
    }

    #[tokio::test]
    async fn unknown_request_is_reported_without_sending() {
        let dir = TempDir::new().unwrap();
        let options = options(
            RunMode::Named {
                request: "delete-user".to_string(),
                args: vec![],
            },
            &dir,
        );
        let mut client = MockHttpClient::new();
        client.expect_send().times(0);
        let service = HttpRequestService::new(Box::new(client));

        let err = execute(&options, &service, &HashMap::<String, String>::new())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "no such request 'delete-user'");
    }

    #[tokio::test]
    async fn template_error_aborts_before_sending() {
        let dir = TempDir::new().unwrap();
        let config = dir.path().join("broken.yaml");
        std::fs::write(
            &config,
            "requests:\n  broken:\n    route: \"{{host}}/x\"\n",
        )
        .unwrap();
        let options = RunOptions {
            config_file: Some(config),
            ..options(
                RunMode::Named {
                    request: "broken".to_string(),
                    args: vec![],
                },
                &dir,
            )
        };
        let mut client = MockHttpClient::new();
        client.expect_send().times(0);
        let service = HttpRequestService::new(Box::new(client));

        let err = execute(&options, &service, &HashMap::<String, String>::new())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "cannot expand route: undefined variable 'host'");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn interactive_request_is_parsed_and_sent() {
        let dir = TempDir::new().unwrap();
        let options = RunOptions {
            editor: Some("printf 'DELETE http://api.local/users/1 HTTP/1.1\\nX-Reason: cleanup\\n\\n' >".to_string()),
            ..options(RunMode::Interactive, &dir)
        };
        let mut client = MockHttpClient::new();
        client
            .expect_send()
            .withf(|request: &Request| {
                request.method == Method::Delete
                    && request.url.as_str() == "http://api.local/users/1"
                    && request.headers.get("X-Reason") == Some("cleanup")
                    && request.body.is_none()
            })
            .times(1)
            .returning(|_| {
                Ok(Response {
                    status: StatusCode::NO_CONTENT,
                    headers: HeaderList::new(),
                    body: Body::default(),
                })
            });
        let service = HttpRequestService::new(Box::new(client));

        execute(&options, &service, &HashMap::<String, String>::new())
            .await
            .unwrap();
    }
}
