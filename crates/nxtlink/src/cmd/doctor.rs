use std::sync::mpsc;
use std::sync::Mutex;
use std::time::Duration;

use bytes::BytesMut;
use clap::Args;
use nxtlink_lcp::{command as builder, decode_frame, encode_frame, opcode, FirmwareVersion};
use nxtlink_lcp::{classify, FrameConfig, LcpReader, LcpWriter, ReplyKind};
use nxtlink_session::{
    Command, Notification, PairingFlag, SessionConfig, SessionManager,
};
use nxtlink_transport::{
    BrickStream, BtAddr, Connector, Result as TransportResult, TransportError,
};

use crate::exit::{CliResult, FAILURE, SUCCESS};
use crate::output::{print_checks, CheckOutput, OutputFormat};

#[derive(Args, Debug, Default)]
pub struct DoctorArgs {}

/// Exercise the engine end to end with no radio: codec, classifier, and
/// a full session lifecycle over a loopback stream.
pub fn run(_args: DoctorArgs, format: OutputFormat) -> CliResult<i32> {
    let checks = vec![check_codec(), check_classifier(), check_engine()];
    let ok = checks.iter().all(|check| check.ok);
    print_checks(&checks, format);
    Ok(if ok { SUCCESS } else { FAILURE })
}

fn check_codec() -> CheckOutput {
    let payload = builder::beep(440, 500);
    let mut wire = BytesMut::new();
    let result = encode_frame(&payload, &mut wire)
        .and_then(|()| decode_frame(&mut wire, FrameConfig::default().max_payload_size));

    match result {
        Ok(Some(frame)) if frame.payload.as_ref() == payload.as_slice() => CheckOutput {
            check: "codec",
            ok: true,
            detail: "frame round-trip".to_string(),
        },
        other => CheckOutput {
            check: "codec",
            ok: false,
            detail: format!("round-trip failed: {other:?}"),
        },
    }
}

fn check_classifier() -> CheckOutput {
    let kind = classify(&firmware_reply());
    CheckOutput {
        check: "classifier",
        ok: kind == Some(ReplyKind::FirmwareVersion),
        detail: format!("firmware reply classified as {kind:?}"),
    }
}

/// Full lifecycle against a scripted brick: connect, query firmware,
/// decode the reply, disconnect.
fn check_engine() -> CheckOutput {
    match run_engine_roundtrip() {
        Ok(version) => CheckOutput {
            check: "engine",
            ok: true,
            detail: format!("loopback session reported {version}"),
        },
        Err(detail) => CheckOutput {
            check: "engine",
            ok: false,
            detail,
        },
    }
}

fn run_engine_roundtrip() -> Result<FirmwareVersion, String> {
    let (near, far) = BrickStream::loopback_pair().map_err(|err| err.to_string())?;

    let brick = std::thread::spawn(move || {
        let reader_stream = match far.try_clone() {
            Ok(stream) => stream,
            Err(_) => return,
        };
        let mut reader = LcpReader::new(reader_stream);
        let mut writer = LcpWriter::new(far);
        while let Ok(frame) = reader.read_frame() {
            if frame.payload.as_ref() == builder::get_firmware_version().as_slice() {
                let _ = writer.send(&firmware_reply());
            }
        }
    });

    let (tx, rx) = mpsc::channel();
    let mut manager = SessionManager::new();
    manager.acquire_with(
        PairingFlag::new(false),
        Some(tx),
        "00:16:53:00:00:00",
        Box::new(LoopbackConnector::new(near)),
        SessionConfig {
            disconnect_settle: Duration::from_millis(50),
            ..SessionConfig::default()
        },
    );
    manager.start().map_err(|err| err.to_string())?;

    let deadline = Duration::from_secs(2);
    match rx.recv_timeout(deadline) {
        Ok(Notification::Connected) => {}
        other => return Err(format!("expected connected, got {other:?}")),
    }

    manager
        .submit(Command::GetFirmwareVersion)
        .map_err(|err| err.to_string())?;

    let version = loop {
        match rx.recv_timeout(deadline) {
            Ok(Notification::Reply { frame, .. }) => {
                break FirmwareVersion::parse(&frame).map_err(|err| err.to_string())?;
            }
            Ok(other) => return Err(format!("unexpected notification {other:?}")),
            Err(err) => return Err(format!("no reply: {err}")),
        }
    };

    manager
        .submit(Command::Disconnect)
        .map_err(|err| err.to_string())?;
    manager.release();
    brick.join().map_err(|_| "brick thread panicked".to_string())?;

    Ok(version)
}

fn firmware_reply() -> Vec<u8> {
    vec![
        opcode::REPLY_COMMAND,
        opcode::GET_FIRMWARE_VERSION,
        0,
        124,
        1,
        31,
        1,
    ]
}

/// Hands out one pre-made loopback stream in place of a radio link.
struct LoopbackConnector {
    stream: Mutex<Option<BrickStream>>,
}

impl LoopbackConnector {
    fn new(stream: BrickStream) -> Self {
        Self {
            stream: Mutex::new(Some(stream)),
        }
    }

    fn take(&self, addr: BtAddr) -> TransportResult<BrickStream> {
        self.stream
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take()
            .ok_or(TransportError::Connect {
                addr,
                source: std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "loopback stream already consumed",
                ),
            })
    }
}

impl Connector for LoopbackConnector {
    fn connect(&self, addr: BtAddr) -> TransportResult<BrickStream> {
        self.take(addr)
    }

    fn connect_fallback(&self, addr: BtAddr) -> TransportResult<BrickStream> {
        self.take(addr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn doctor_passes_without_hardware() {
        assert!(check_codec().ok);
        assert!(check_classifier().ok);
        let engine = check_engine();
        assert!(engine.ok, "{}", engine.detail);
    }
}
