use std::io::{self, Write};

use clap::{Parser, Subcommand};
use serde_json::Value;

use memstore_client::{Client, ClientError, ClientResult};
use memstore_common::DEFAULT_URL;

#[derive(Parser, Debug)]
#[command(name = "memstore-cli", about = "memstore CLI client")]
struct Args {
    #[arg(long, env = "MEMSTORE_URL", default_value = DEFAULT_URL)]
    url: String,

    /// Comando para executar diretamente (sem ele, abre o prompt interativo)
    #[command(subcommand)]
    command: Option<Command>,
}

/// Uma linha digitada no prompt interativo.
#[derive(Parser, Debug)]
#[command(name = "memstore", no_binary_name = true, disable_help_flag = true)]
struct Line {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, PartialEq)]
enum Command {
    /// Grava uma chave com TTL em segundos
    Set {
        key: String,
        value: String,
        #[arg(long)]
        ttl: i64,
    },
    /// Lê o valor de uma chave
    Get { key: String },
    /// Troca o valor de uma chave existente, mantendo o TTL
    Update { key: String, value: String },
    /// Remove uma chave
    Remove { key: String },
    /// Empilha um item na lista
    Push { key: String, item: String },
    /// Desempilha o item do topo da lista
    Pop { key: String },
    /// Estado do servidor
    Health,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let client = Client::new(&args.url)?;

    // Modo comando único (via argumentos)
    if let Some(command) = args.command {
        match execute(&client, command).await {
            Ok(output) => println!("{output}"),
            Err(e) => {
                println!("{}", format_error(&e));
                std::process::exit(1);
            }
        }
        return Ok(());
    }

    println!("Conectado a {}", client.base_url());

    let stdin = io::stdin();
    let mut input = String::new();

    loop {
        print!("memstore> ");
        io::stdout().flush()?;

        input.clear();
        if stdin.read_line(&mut input)? == 0 {
            break; // EOF
        }

        let line = input.trim();
        if line.is_empty() {
            continue;
        }

        if line.eq_ignore_ascii_case("quit") || line.eq_ignore_ascii_case("exit") {
            break;
        }

        let tokens = tokenize(line);
        let command = match Line::try_parse_from(&tokens) {
            Ok(parsed) => parsed.command,
            Err(e) => {
                println!("{e}");
                continue;
            }
        };

        match execute(&client, command).await {
            Ok(output) => println!("{output}"),
            Err(e) => println!("{}", format_error(&e)),
        }
    }

    Ok(())
}

async fn execute(client: &Client, command: Command) -> ClientResult<String> {
    match command {
        Command::Set { key, value, ttl } => {
            client.set(&key, &parse_value(&value), ttl).await?;
            Ok("OK".into())
        }
        Command::Get { key } => client.get(&key).await.map(|v| quote(&v)),
        Command::Update { key, value } => {
            client.update(&key, &parse_value(&value)).await?;
            Ok("OK".into())
        }
        Command::Remove { key } => {
            client.remove(&key).await?;
            Ok("OK".into())
        }
        Command::Push { key, item } => {
            client.push(&key, &parse_value(&item)).await?;
            Ok("OK".into())
        }
        Command::Pop { key } => client.pop(&key).await.map(|v| quote(&v)),
        Command::Health => {
            let health = client.health().await?;
            Ok(format!(
                "status: {}\nkeys: {}\nexpiry_worker: {}",
                health.status, health.keys, health.expiry_worker
            ))
        }
    }
}

/// Argumentos que são JSON válido vão como JSON; o resto vai como string.
fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

fn quote(value: &str) -> String {
    format!("\"{value}\"")
}

fn format_error(err: &ClientError) -> String {
    match err {
        ClientError::Api { message, .. } => format!("(error) {message}"),
        ClientError::Http(e) if e.is_connect() => "(error) could not connect to server".into(),
        other => format!("(error) {other}"),
    }
}

/// Tokeniza a linha de input com suporte a strings quoted.
fn tokenize(input: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quote = false;
    let mut quote_char = '"';
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quote {
            if c == quote_char {
                in_quote = false;
            } else if c == '\\' {
                match chars.peek() {
                    Some(&'n') => current.push('\n'),
                    Some(&'t') => current.push('\t'),
                    Some(&next) if matches!(next, '\\' | '"' | '\'') => current.push(next),
                    _ => {
                        current.push(c);
                        continue;
                    }
                }
                chars.next();
            } else {
                current.push(c);
            }
        } else if c == '"' || c == '\'' {
            in_quote = true;
            quote_char = c;
        } else if c.is_whitespace() {
            if !current.is_empty() {
                tokens.push(std::mem::take(&mut current));
            }
        } else {
            current.push(c);
        }
    }

    if !current.is_empty() {
        tokens.push(current);
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn tokenize_simple() {
        assert_eq!(tokenize("set key value"), vec!["set", "key", "value"]);
    }

    #[test]
    fn tokenize_quoted() {
        assert_eq!(
            tokenize(r#"set key "hello world""#),
            vec!["set", "key", "hello world"]
        );
    }

    #[test]
    fn tokenize_single_quoted_json() {
        assert_eq!(
            tokenize(r#"push tasks '{"id": 1}'"#),
            vec!["push", "tasks", r#"{"id": 1}"#]
        );
    }

    #[test]
    fn tokenize_escaped() {
        assert_eq!(
            tokenize(r#"set key "hello\"world""#),
            vec!["set", "key", r#"hello"world"#]
        );
    }

    #[test]
    fn tokenize_unknown_escape_is_kept() {
        assert_eq!(tokenize(r#""a\qb""#), vec![r"a\qb"]);
    }

    #[test]
    fn tokenize_empty() {
        assert_eq!(tokenize(""), Vec::<String>::new());
    }

    #[test]
    fn parse_value_json_or_string() {
        assert_eq!(parse_value("42"), json!(42));
        assert_eq!(parse_value(r#"{"a":[1,2]}"#), json!({"a": [1, 2]}));
        assert_eq!(parse_value("hello"), json!("hello"));
        assert_eq!(parse_value(r#""quoted""#), json!("quoted"));
    }

    #[test]
    fn line_parses_set_with_ttl() {
        let line = Line::try_parse_from(["set", "k", "v", "--ttl", "60"]).unwrap();
        assert_eq!(
            line.command,
            Command::Set {
                key: "k".into(),
                value: "v".into(),
                ttl: 60,
            }
        );
    }

    #[test]
    fn line_requires_ttl_on_set() {
        assert!(Line::try_parse_from(["set", "k", "v"]).is_err());
    }

    #[test]
    fn line_parses_pop() {
        let line = Line::try_parse_from(["pop", "tasks"]).unwrap();
        assert_eq!(line.command, Command::Pop { key: "tasks".into() });
    }

    #[test]
    fn line_rejects_unknown_command() {
        assert!(Line::try_parse_from(["incr", "counter"]).is_err());
    }

    #[test]
    fn format_api_error() {
        let err = ClientError::Api {
            status: 404,
            message: "Key not found".into(),
        };
        assert_eq!(format_error(&err), "(error) Key not found");
    }
}
