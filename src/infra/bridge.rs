use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::Stdio;

use prost::Message;
use thiserror::Error;
use time::{OffsetDateTime, format_description};
use tokio::io::{AsyncRead, AsyncWrite, BufReader};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tracing::{debug, info, warn};

use crate::actions::{ActionRequest, ActionSchema, ActionSpace};
use crate::bridge_interface::{ActRequest, ActResponse, StartRequest, StartResponse, StartResult};
use crate::config::BridgeCommand;
use crate::state::TimeStep;

use super::wire::{
    Resolutions, function_call_to_proto, read_delimited, schema_from_announced,
    time_step_from_proto, write_delimited,
};

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("failed to spawn bridge {program:?}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("bridge I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("invalid message from bridge: {0}")]
    Decode(#[from] prost::DecodeError),

    #[error("start failed (result {})", .0.as_str_name())]
    StartFailed(StartResult),

    #[error("unknown {what} {value} from bridge")]
    UnknownEnum { what: &'static str, value: i32 },

    #[error("bridge closed the connection")]
    Closed,

    #[error("malformed message from bridge: {0}")]
    Malformed(&'static str),
}

/// The spawned bridge process. Its stdio is owned by the matching [`ProcessChannel`].
pub struct BridgeProcess {
    child: Child,
}

pub type ProcessChannel = BridgeChannel<BufReader<ChildStdout>, ChildStdin>;

/// Spawn the bridge and hook a message channel up to its stdin/stdout.
pub fn spawn(command: &BridgeCommand) -> Result<(BridgeProcess, ProcessChannel), BridgeError> {
    let spawn_error = |source| BridgeError::Spawn {
        program: command.program.clone(),
        source,
    };

    let mut child = Command::new(&command.program)
        .args(&command.args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit())
        .kill_on_drop(true)
        .spawn()
        .map_err(spawn_error)?;

    let stdin = child
        .stdin
        .take()
        .ok_or_else(|| spawn_error(io::Error::other("stdin not captured")))?;
    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| spawn_error(io::Error::other("stdout not captured")))?;

    info!("Bridge started: {} {}", command.program, command.args.join(" "));
    Ok((
        BridgeProcess { child },
        BridgeChannel::new(BufReader::new(stdout), stdin),
    ))
}

impl BridgeProcess {
    /// Wait for the bridge to exit. Drop the channel first so the bridge sees
    /// its stdin close.
    pub async fn shutdown(mut self) -> Result<(), BridgeError> {
        let status = self.child.wait().await?;
        if status.success() {
            info!("Bridge exited");
        } else {
            warn!("Bridge exited with {}", status);
        }
        Ok(())
    }
}

/// Request/response exchange with the bridge.
pub struct BridgeChannel<R, W> {
    reader: R,
    writer: W,
}

impl<R, W> BridgeChannel<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    async fn exchange<Req, Resp>(&mut self, request: &Req) -> Result<Option<Resp>, BridgeError>
    where
        Req: Message,
        Resp: Message + Default,
    {
        write_delimited(&mut self.writer, request).await?;
        read_delimited(&mut self.reader).await
    }

    /// Ask the bridge for a new game. Queued requests are retried. Returns
    /// `None` when the bridge has closed its end and will not start another game.
    pub async fn start(
        &mut self,
        request: StartRequest,
        space: ActionSpace,
        replays_folder: Option<&str>,
    ) -> Result<Option<Episode<'_, R, W>>, BridgeError> {
        loop {
            let response: StartResponse = match self.exchange(&request).await {
                Ok(Some(response)) => response,
                Ok(None) => return Ok(None),
                Err(BridgeError::Io(e)) if e.kind() == io::ErrorKind::BrokenPipe => {
                    debug!("Bridge stdin closed: {}", e);
                    return Ok(None);
                }
                Err(e) => return Err(e),
            };

            let result =
                StartResult::try_from(response.result).map_err(|_| BridgeError::UnknownEnum {
                    what: "start result",
                    value: response.result,
                })?;

            match result {
                StartResult::Ok => {
                    let replay_file = replays_folder.and_then(|folder| {
                        ReplayFile::new(folder, &request, &response)
                            .inspect_err(|e| warn!("Not recording replay: {}", e))
                            .ok()
                    });
                    let resolutions = Resolutions::from(&request);
                    return Episode::new(self, space, resolutions, response, replay_file)
                        .map(Some);
                }
                StartResult::Queued => {
                    info!("Game queued, retrying ...");
                }
                _ => return Err(BridgeError::StartFailed(result)),
            }
        }
    }
}

/// One running game.
pub struct Episode<'c, R, W> {
    channel: &'c mut BridgeChannel<R, W>,
    replay_file: Option<ReplayFile>,
    resolutions: Resolutions,
    pub game_id: String,
    pub schema: ActionSchema,
    pub step: TimeStep,
}

impl<'c, R, W> Episode<'c, R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    fn new(
        channel: &'c mut BridgeChannel<R, W>,
        space: ActionSpace,
        resolutions: Resolutions,
        response: StartResponse,
        replay_file: Option<ReplayFile>,
    ) -> Result<Self, BridgeError> {
        let game_id = response
            .game_id
            .ok_or(BridgeError::Malformed("start response without game id"))?;
        let step = response
            .step
            .as_ref()
            .ok_or(BridgeError::Malformed("start response without first step"))?;
        Ok(Episode {
            channel,
            replay_file,
            schema: schema_from_announced(space, &response.functions),
            step: time_step_from_proto(step, resolutions)?,
            resolutions,
            game_id,
        })
    }

    /// Submit the action for the current step and wait for the next one.
    pub async fn act(&mut self, action: &ActionRequest) -> Result<(), BridgeError> {
        let request = ActRequest {
            game_id: self.game_id.clone(),
            action: Some(function_call_to_proto(action)),
        };
        let response: ActResponse = self
            .channel
            .exchange(&request)
            .await?
            .ok_or(BridgeError::Closed)?;

        if let Some(ref mut replay_file) = self.replay_file {
            replay_file.append(&request, &response)?;
        }

        let step = response
            .step
            .as_ref()
            .ok_or(BridgeError::Malformed("act response without step"))?;
        self.step = time_step_from_proto(step, self.resolutions)?;
        Ok(())
    }
}

/// Every exchange of one game, delimited the same way as on the wire.
struct ReplayFile {
    file: File,
}

impl ReplayFile {
    fn new(
        replays_folder: &str,
        start_request: &StartRequest,
        start_response: &StartResponse,
    ) -> io::Result<Self> {
        let game_id = start_response.game_id.as_deref().unwrap_or("unknown");
        let filename = replay_path(replays_folder, &start_request.agent_name, game_id)?;

        if let Some(parent) = filename.parent()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent)?;
        }

        let file = File::create(&filename)?;
        debug!("Recording replay to {}", filename.display());
        let mut replay_file = ReplayFile { file };

        replay_file.write_delimited_message(start_request)?;
        replay_file.write_delimited_message(start_response)?;

        Ok(replay_file)
    }

    fn append(&mut self, act_request: &ActRequest, act_response: &ActResponse) -> io::Result<()> {
        self.write_delimited_message(act_request)?;
        self.write_delimited_message(act_response)?;
        Ok(())
    }

    fn write_delimited_message<T: Message>(&mut self, message: &T) -> io::Result<()> {
        self.file.write_all(&message.encode_length_delimited_to_vec())?;
        self.file.flush()
    }
}

/// `<folder>/<agent> - <yyyymmdd-hhmmss> - <game id>.pbr`
fn replay_path(replays_folder: &str, agent_name: &str, game_id: &str) -> io::Result<PathBuf> {
    let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
    let format =
        format_description::parse_borrowed::<2>("[year][month][day]-[hour][minute][second]")
            .map_err(io::Error::other)?;
    let date_time_str = now.format(&format).map_err(io::Error::other)?;

    Ok(Path::new(replays_folder).join(format!(
        "{} - {} - {}.pbr",
        agent_name, date_time_str, game_id
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::FunctionName;
    use crate::bridge_interface as proto;
    use tokio::io::DuplexStream;

    fn first_step() -> proto::Step {
        proto::Step {
            step_type: proto::StepType::First as i32,
            screen_size: 84,
            minimap_size: 64,
            raw_resolution: 64,
            ..Default::default()
        }
    }

    fn start_response(result: StartResult) -> StartResponse {
        StartResponse {
            result: result as i32,
            game_id: (result == StartResult::Ok).then(|| "g-1".to_string()),
            functions: Vec::new(),
            step: (result == StartResult::Ok).then(first_step),
        }
    }

    /// Channel whose other end already holds the given bridge replies.
    async fn scripted(replies: Vec<Vec<u8>>) -> (BridgeChannel<DuplexStream, DuplexStream>, DuplexStream) {
        let (agent_read, mut bridge_write) = tokio::io::duplex(64 * 1024);
        let (agent_write, bridge_read) = tokio::io::duplex(64 * 1024);
        for reply in replies {
            tokio::io::AsyncWriteExt::write_all(&mut bridge_write, &reply)
                .await
                .expect("write");
        }
        drop(bridge_write);
        (BridgeChannel::new(agent_read, agent_write), bridge_read)
    }

    #[tokio::test]
    async fn test_queued_start_is_retried() {
        let (mut channel, mut bridge_read) = scripted(vec![
            start_response(StartResult::Queued).encode_length_delimited_to_vec(),
            start_response(StartResult::Ok).encode_length_delimited_to_vec(),
        ])
        .await;

        let episode = channel
            .start(StartRequest::default(), ActionSpace::Raw, None)
            .await
            .expect("start")
            .expect("episode");
        assert_eq!(episode.game_id, "g-1");
        assert!(episode.step.first());
        assert_eq!(
            episode.schema.id(FunctionName::RawAttackPt),
            ActionSchema::defaults(ActionSpace::Raw).id(FunctionName::RawAttackPt)
        );
        drop(episode);

        for _ in 0..2 {
            let request: Option<StartRequest> =
                read_delimited(&mut bridge_read).await.expect("read");
            assert!(request.is_some());
        }
    }

    #[tokio::test]
    async fn test_refused_start_is_an_error() {
        let (mut channel, _bridge_read) = scripted(vec![
            start_response(StartResult::MapUnavailable).encode_length_delimited_to_vec(),
        ])
        .await;

        let result = channel
            .start(StartRequest::default(), ActionSpace::Raw, None)
            .await;
        assert!(matches!(
            result,
            Err(BridgeError::StartFailed(StartResult::MapUnavailable))
        ));
    }

    #[tokio::test]
    async fn test_closed_bridge_starts_nothing() {
        let (mut channel, _bridge_read) = scripted(Vec::new()).await;
        let result = channel
            .start(StartRequest::default(), ActionSpace::Raw, None)
            .await
            .expect("start");
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_act_advances_the_step_and_records_replay() {
        let last = ActResponse {
            step: Some(proto::Step {
                step_type: proto::StepType::Last as i32,
                reward: 1.0,
                ..first_step()
            }),
        };
        let (mut channel, mut bridge_read) = scripted(vec![
            start_response(StartResult::Ok).encode_length_delimited_to_vec(),
            last.encode_length_delimited_to_vec(),
        ])
        .await;

        let folder = std::env::temp_dir().join(format!("probebot-replays-{}", std::process::id()));
        let folder_str = folder.to_string_lossy().to_string();
        let request = StartRequest {
            agent_name: "zealot-rush".to_string(),
            ..Default::default()
        };

        let mut episode = channel
            .start(request, ActionSpace::Raw, Some(&folder_str))
            .await
            .expect("start")
            .expect("episode");
        let no_op = ActionRequest::no_op(&episode.schema);
        episode.act(&no_op).await.expect("act");
        assert!(episode.step.last());
        assert!((episode.step.observation.reward - 1.0).abs() < 1e-6);
        drop(episode);

        let _: Option<StartRequest> = read_delimited(&mut bridge_read).await.expect("read");
        let act: Option<ActRequest> = read_delimited(&mut bridge_read).await.expect("read");
        let act = act.expect("act request");
        assert_eq!(act.game_id, "g-1");
        assert_eq!(act.action.map(|a| a.function), Some(0));

        let replays: Vec<_> = std::fs::read_dir(&folder)
            .expect("replay folder")
            .filter_map(Result::ok)
            .collect();
        assert_eq!(replays.len(), 1);
        let name = replays[0].file_name().to_string_lossy().to_string();
        assert!(name.starts_with("zealot-rush - "));
        assert!(name.ends_with(" - g-1.pbr"));
        let _ = std::fs::remove_dir_all(&folder);
    }

    #[tokio::test]
    async fn test_unset_step_sizes_come_from_the_start_request() {
        let mut response = start_response(StartResult::Ok);
        if let Some(step) = response.step.as_mut() {
            step.screen_size = 0;
            step.minimap_size = 0;
            step.raw_resolution = 0;
        }
        let (mut channel, _bridge_read) =
            scripted(vec![response.encode_length_delimited_to_vec()]).await;
        let request = StartRequest {
            screen_size: 84,
            minimap_size: 64,
            ..Default::default()
        };

        let episode = channel
            .start(request, ActionSpace::Raw, None)
            .await
            .expect("start")
            .expect("episode");
        let obs = &episode.step.observation;
        assert_eq!(obs.screen_size, 84);
        assert_eq!(obs.minimap_size, 64);
        assert_eq!(obs.raw_resolution, 64);
    }

    #[test]
    fn test_replay_path_layout() {
        let path = replay_path("replays", "random", "g-7").expect("path");
        assert_eq!(path.parent(), Some(Path::new("replays")));
        let name = path.file_name().expect("name").to_string_lossy().to_string();
        let stamp = name
            .strip_prefix("random - ")
            .and_then(|rest| rest.strip_suffix(" - g-7.pbr"))
            .expect("layout");
        assert_eq!(stamp.len(), 15);
        assert_eq!(stamp.as_bytes()[8], b'-');
        assert!(stamp.chars().filter(|c| *c != '-').all(|c| c.is_ascii_digit()));
    }

    #[tokio::test]
    async fn test_act_on_closed_bridge_fails() {
        let (mut channel, _bridge_read) = scripted(vec![
            start_response(StartResult::Ok).encode_length_delimited_to_vec(),
        ])
        .await;
        let mut episode = channel
            .start(StartRequest::default(), ActionSpace::Raw, None)
            .await
            .expect("start")
            .expect("episode");
        let no_op = ActionRequest::no_op(&episode.schema);
        assert!(matches!(episode.act(&no_op).await, Err(BridgeError::Closed)));
    }
}
