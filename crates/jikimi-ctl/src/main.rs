//! # jikimi-ctl
//!
//! JIKIMI 서버 원격 제어 CLI.
//!
//! 서버에 TCP로 접속해 start/stop 명령을 보내고, 서버가 보내는
//! `{"log":"..."}` 행을 stdout으로 스트리밍한다. 감시 루프는 이 연결에
//! 묶여 있으므로 start 후에는 연결을 유지해야 하며, Ctrl+C를 누르면
//! stop을 보내고 루프 종료를 기다린 뒤 빠져나온다.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use jikimi_core::models::protocol::{Command, LogLine};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;

/// JIKIMI 서버 원격 제어
#[derive(Parser, Debug)]
#[command(name = "jikimi-ctl")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// 서버 호스트
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// 서버 포트
    #[arg(long, short = 'p', default_value_t = 12345)]
    port: u16,

    #[command(subcommand)]
    command: CtlCommand,
}

#[derive(Subcommand, Debug)]
enum CtlCommand {
    /// 감시 시작 후 로그 스트리밍 (Ctrl+C로 중지 요청)
    Start {
        /// 감시 영역 — `x,y,w,h` 정수 4개
        #[arg(long, value_parser = parse_zone)]
        zone: [i64; 4],
    },
    /// 유휴 세션에 stop 전송 (프로토콜 점검용)
    Stop,
}

/// `x,y,w,h` 형식의 영역 인자 파싱
fn parse_zone(value: &str) -> Result<[i64; 4], String> {
    let parts: Vec<&str> = value.split(',').map(str::trim).collect();
    if parts.len() != 4 {
        return Err(format!("정수 4개가 필요합니다 (x,y,w,h): {value:?}"));
    }
    let mut zone = [0i64; 4];
    for (i, part) in parts.iter().enumerate() {
        zone[i] = part
            .parse()
            .map_err(|_| format!("정수가 아닙니다: {part:?}"))?;
    }
    Ok(zone)
}

/// 명령 한 행 전송
async fn send_command(writer: &mut OwnedWriteHalf, command: &Command) -> Result<()> {
    let mut line = serde_json::to_vec(command)?;
    line.push(b'\n');
    writer
        .write_all(&line)
        .await
        .context("명령 전송 실패")?;
    Ok(())
}

/// 로그 행 본문 추출 — 형식이 어긋난 행은 원문 그대로 반환
fn log_body(line: &str) -> String {
    match serde_json::from_str::<LogLine>(line) {
        Ok(entry) => entry.log,
        Err(_) => line.to_string(),
    }
}

/// start 전송 후 로그 스트리밍, Ctrl+C에 stop으로 응답
async fn run_start(
    mut writer: OwnedWriteHalf,
    mut lines: tokio::io::Lines<BufReader<OwnedReadHalf>>,
    zone: [i64; 4],
) -> Result<()> {
    send_command(&mut writer, &Command::Start { zone }).await?;

    let mut stopping = false;
    loop {
        tokio::select! {
            line = lines.next_line() => {
                match line.context("서버 응답 읽기 실패")? {
                    Some(line) => {
                        let body = log_body(&line);
                        println!("{body}");
                        // stop에 대한 최종 응답을 받으면 종료
                        if stopping && body == "Stop requested" {
                            return Ok(());
                        }
                    }
                    None => {
                        if !stopping {
                            eprintln!("서버가 연결을 닫았습니다");
                        }
                        return Ok(());
                    }
                }
            }
            _ = tokio::signal::ctrl_c(), if !stopping => {
                eprintln!("중지 요청 전송 중...");
                send_command(&mut writer, &Command::Stop).await?;
                stopping = true;
            }
        }
    }
}

/// stop 한 번 보내고 응답 확인
async fn run_stop(
    mut writer: OwnedWriteHalf,
    mut lines: tokio::io::Lines<BufReader<OwnedReadHalf>>,
) -> Result<()> {
    send_command(&mut writer, &Command::Stop).await?;

    while let Some(line) = lines.next_line().await.context("서버 응답 읽기 실패")? {
        let body = log_body(&line);
        println!("{body}");
        if body == "Stop requested" {
            return Ok(());
        }
    }
    bail!("응답 전에 서버가 연결을 닫았습니다")
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let addr = format!("{}:{}", args.host, args.port);
    let stream = TcpStream::connect(&addr)
        .await
        .with_context(|| format!("서버 연결 실패: {addr}"))?;
    let (read_half, write_half) = stream.into_split();
    let lines = BufReader::new(read_half).lines();

    match args.command {
        CtlCommand::Start { zone } => run_start(write_half, lines, zone).await,
        CtlCommand::Stop => run_stop(write_half, lines).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_zone_valid() {
        assert_eq!(parse_zone("0,0,800,600").unwrap(), [0, 0, 800, 600]);
        assert_eq!(parse_zone(" 10, -5, 100, 50 ").unwrap(), [10, -5, 100, 50]);
    }

    #[test]
    fn parse_zone_wrong_arity() {
        assert!(parse_zone("1,2,3").is_err());
        assert!(parse_zone("1,2,3,4,5").is_err());
    }

    #[test]
    fn parse_zone_non_integer() {
        assert!(parse_zone("a,b,c,d").is_err());
        assert!(parse_zone("1,2,3,4.5").is_err());
    }

    #[test]
    fn log_body_falls_back_to_raw() {
        assert_eq!(log_body(r#"{"log":"Watching!"}"#), "Watching!");
        assert_eq!(log_body("plain text"), "plain text");
    }
}
