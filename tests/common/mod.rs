use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

/// Generate a unique suffix based on timestamp to avoid collisions.
pub fn unique_suffix() -> String {
    let ts = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    format!("{}", ts % 1_000_000_000)
}

/// Write an executable shell script that speaks just enough UCI for the
/// pipeline tests, and return its path.
#[cfg(unix)]
pub fn write_mock_engine(name: &str, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = std::env::temp_dir().join(format!("{name}-{}.sh", unique_suffix()));
    fs::write(&path, body).unwrap();
    let mut perms = fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms).unwrap();
    path
}

/// Mock engine answering any `go` with three centipawn lines for the
/// starting position, plus an informational record the client must skip.
#[cfg(unix)]
pub fn standard_mock_engine() -> PathBuf {
    write_mock_engine(
        "mock-uci",
        r#"#!/bin/sh
echo "id name MockFish 1.0"
echo "uciok"
while read line; do
  case "$line" in
    isready) echo "readyok" ;;
    go*)
      echo "info depth 10 currmove a2a3 currmovenumber 20"
      echo "info depth 10 seldepth 12 multipv 1 score cp 35 nodes 1000 pv e2e4 e7e5 g1f3"
      echo "info depth 10 seldepth 12 multipv 2 score cp 20 nodes 1000 pv g1f3 d7d5 c2c4"
      echo "info depth 10 seldepth 12 multipv 3 score cp 10 nodes 1000 pv c2c4 e7e5 b1c3"
      echo "info string NNUE evaluation enabled"
      echo "bestmove e2e4"
      ;;
    quit) exit 0 ;;
  esac
done
"#,
    )
}
