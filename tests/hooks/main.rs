use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

use serde_json::{json, Value};
use tempfile::TempDir;

fn run(root: &Path, args: &[&str], stdin: &str) -> Output {
  let mut child = Command::new(env!("CARGO_BIN_EXE_superagents-hooks"))
    .arg("--root")
    .arg(root)
    .args(args)
    .env_remove("RUST_LOG")
    .stdin(Stdio::piped())
    .stdout(Stdio::piped())
    .stderr(Stdio::piped())
    .spawn()
    .unwrap();
  child
    .stdin
    .take()
    .unwrap()
    .write_all(stdin.as_bytes())
    .unwrap();
  child.wait_with_output().unwrap()
}

fn hook(root: &Path, event: &str, payload: Value) -> Value {
  let output = run(root, &[event], &payload.to_string());
  assert!(output.status.success(), "{event} exited with {}", output.status);
  serde_json::from_slice(&output.stdout).unwrap()
}

fn write(root: &Path, rel: &str, content: &str) {
  let path = root.join(rel);
  std::fs::create_dir_all(path.parent().unwrap()).unwrap();
  std::fs::write(path, content).unwrap();
}

fn state(root: &Path) -> Value {
  let content = std::fs::read_to_string(root.join(".agents/workflow.json")).unwrap();
  serde_json::from_str(&content).unwrap()
}

fn commit(root: &Path, message: &str) {
  let response = hook(
    root,
    "post-tool-use",
    json!({
      "tool_name": "Bash",
      "tool_input": { "command": format!("git commit -m \"{message}\"") },
    }),
  );
  assert_eq!(response, json!({}));
}

fn edit(root: &Path, path: &str) -> Value {
  hook(
    root,
    "pre-tool-use",
    json!({ "tool_name": "Edit", "tool_input": { "file_path": path }, "session_id": "s1" }),
  )
}

// --- SessionStart / SubagentStop ---

#[test]
fn session_start_approves_with_capability_summary() {
  let tmp = TempDir::new().unwrap();
  let response = hook(tmp.path(), "session-start", json!({}));
  assert_eq!(response["decision"], "approve");
  assert!(response["additionalContext"]
    .as_str()
    .unwrap()
    .contains("/superagents:work"));
}

#[test]
fn subagent_stop_is_always_empty() {
  let tmp = TempDir::new().unwrap();
  write(tmp.path(), ".agents/work/queued.md", "## Up Next\n- **a** - x\n");
  assert_eq!(hook(tmp.path(), "subagent-stop", json!({})), json!({}));
}

// --- Full RED → GREEN → REFACTOR → ARCHITECTURE loop ---

#[test]
fn full_work_item_cycle() {
  let tmp = TempDir::new().unwrap();
  let root = tmp.path();
  write(
    root,
    ".agents/work/queued.md",
    "# Queue\n\n## In Progress\n- **add-login** - Login form\n\n## Up Next\n",
  );

  // Stop adopts the in-progress item and keeps the agent going.
  let response = hook(root, "stop", json!({}));
  assert_eq!(response["decision"], "block");
  assert!(response["reason"].as_str().unwrap().contains("add-login"));
  assert_eq!(state(root)["currentWorkItem"], "add-login");

  commit(root, "test(auth): add login tests");
  assert_eq!(state(root)["currentPhase"], "red");
  assert_eq!(edit(root, "src/login.ts")["decision"], "block");
  assert_eq!(edit(root, "src/login.test.ts"), json!({}));

  commit(root, "feat(auth): implement login");
  assert_eq!(state(root)["currentPhase"], "green");
  assert_eq!(edit(root, "src/login.test.ts")["decision"], "block");
  assert_eq!(edit(root, "src/login.ts"), json!({}));

  let response = hook(root, "stop", json!({}));
  let reason = response["reason"].as_str().unwrap();
  assert!(reason.contains("add-login"));
  assert!(reason.contains("green"));

  commit(root, "refactor(auth): extract validator");
  assert_eq!(state(root)["currentPhase"], "refactor");

  commit(root, "docs(auth): update architecture notes");
  let s = state(root);
  assert_eq!(s["currentPhase"], Value::Null);
  assert_eq!(s["currentWorkItem"], Value::Null);
  assert_eq!(s["completedItems"], json!(["add-login"]));

  // The item is archived by the agent and removed from the queue.
  write(root, ".agents/work/queued.md", "## In Progress\n\n## Up Next\n");
  write(root, ".agents/archive/completed.md", "### add-login\n");
  assert_eq!(hook(root, "stop", json!({})), json!({}));
}

// --- Stop ---

#[test]
fn stop_on_fresh_project_allows_and_creates_state() {
  let tmp = TempDir::new().unwrap();
  assert_eq!(hook(tmp.path(), "stop", json!({})), json!({}));
  let s = state(tmp.path());
  assert_eq!(s["currentWorkItem"], Value::Null);
  assert!(s["lastUpdated"].is_string());
}

#[test]
fn stop_lists_at_most_three_pending_items() {
  let tmp = TempDir::new().unwrap();
  write(
    tmp.path(),
    ".agents/work/queued.md",
    "## Up Next\n- **one** - a\n- **two** - b\n- **three** - c\n- **four** - d\n",
  );
  let response = hook(tmp.path(), "stop", json!({}));
  let reason = response["reason"].as_str().unwrap();
  assert!(reason.contains("one, two, three, ..."));
  assert!(!reason.contains("four"));
}

#[test]
fn stop_resolves_root_from_transcript_path() {
  let cwd = TempDir::new().unwrap();
  let project = TempDir::new().unwrap();
  write(project.path(), ".agents/work/queued.md", "## Up Next\n- **remote** - x\n");
  let transcript = project.path().join(".claude").join("session.jsonl");

  let response = hook(
    cwd.path(),
    "stop",
    json!({ "transcript_path": transcript }),
  );
  assert!(response["reason"].as_str().unwrap().contains("remote"));
  assert!(project.path().join(".agents/workflow.json").exists());
  assert!(!cwd.path().join(".agents/workflow.json").exists());
}

// --- PreToolUse ---

#[test]
fn private_workflow_files_are_always_editable() {
  let tmp = TempDir::new().unwrap();
  write(
    tmp.path(),
    ".agents/workflow.json",
    r#"{"currentPhase":"red","currentWorkItem":"x"}"#,
  );
  assert_eq!(edit(tmp.path(), ".agents/workflow.json"), json!({}));
  assert_eq!(edit(tmp.path(), ".agents/work/queued.md"), json!({}));
}

#[test]
fn minimal_legacy_state_file_still_gates() {
  let tmp = TempDir::new().unwrap();
  write(tmp.path(), ".agents/workflow.json", r#"{"version":"0.1","currentPhase":"red"}"#);
  let response = edit(tmp.path(), "src/app.ts");
  assert_eq!(response["decision"], "block");
  assert!(response["reason"].as_str().unwrap().contains("src/app.ts"));
}

#[test]
fn research_and_architecture_phases_are_ungated() {
  let tmp = TempDir::new().unwrap();
  for phase in ["research", "architecture", "refactor"] {
    write(
      tmp.path(),
      ".agents/workflow.json",
      &json!({ "currentPhase": phase, "currentWorkItem": "x" }).to_string(),
    );
    assert_eq!(edit(tmp.path(), "src/app.ts"), json!({}));
    assert_eq!(edit(tmp.path(), "src/app.test.ts"), json!({}));
  }
}

// --- PostToolUse ---

#[test]
fn non_commit_commands_leave_state_untouched() {
  let tmp = TempDir::new().unwrap();
  commit_free(tmp.path(), "npm test");
  commit_free(tmp.path(), "git status");
  assert!(!tmp.path().join(".agents/workflow.json").exists());
}

#[test]
fn completed_item_is_reported_on_stderr_for_archival() {
  let tmp = TempDir::new().unwrap();
  write(tmp.path(), ".agents/workflow.json", r#"{"currentWorkItem":"add-login"}"#);

  let payload = json!({
    "tool_name": "Bash",
    "tool_input": { "command": "git commit -m \"docs(auth): update architecture notes\"" },
  });
  let output = run(tmp.path(), &["post-tool-use"], &payload.to_string());
  assert!(output.status.success());
  assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "{}");

  let stderr = String::from_utf8_lossy(&output.stderr);
  assert!(stderr.contains("add-login"), "stderr: {stderr}");
  assert!(stderr.contains("completed.md"), "stderr: {stderr}");
  assert_eq!(state(tmp.path())["completedItems"], json!(["add-login"]));
}

#[test]
fn quoted_commit_text_does_not_change_phase() {
  let tmp = TempDir::new().unwrap();
  commit_free(tmp.path(), "echo \"next: git commit -m 'feat: x'\"");
  commit_free(tmp.path(), "git commit -F msg.txt && git stash -m \"test: wip\"");
  assert!(!tmp.path().join(".agents/workflow.json").exists());
}

fn commit_free(root: &Path, command: &str) {
  let response = hook(
    root,
    "post-tool-use",
    json!({ "tool_name": "Bash", "tool_input": { "command": command } }),
  );
  assert_eq!(response, json!({}));
}

// --- UserPromptSubmit ---

#[test]
fn prompt_submit_suggests_matching_skills() {
  let tmp = TempDir::new().unwrap();
  let response = hook(
    tmp.path(),
    "user-prompt-submit",
    json!({ "prompt": "What's next in the backlog?" }),
  );
  assert_eq!(response["decision"], "approve");
  assert_eq!(response["contextFiles"], json!([".agents/context/work.md"]));
}

#[test]
fn prompt_submit_without_match_only_approves() {
  let tmp = TempDir::new().unwrap();
  let response = hook(tmp.path(), "user-prompt-submit", json!({ "prompt": "hi" }));
  assert_eq!(response, json!({ "decision": "approve" }));
}

// --- Failure modes ---

#[test]
fn malformed_payload_is_permissive() {
  let tmp = TempDir::new().unwrap();
  write(
    tmp.path(),
    ".agents/workflow.json",
    r#"{"currentPhase":"red","currentWorkItem":"x"}"#,
  );
  let output = run(tmp.path(), &["pre-tool-use"], "this is not json");
  assert!(output.status.success());
  assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "{}");
}

#[test]
fn corrupt_state_file_is_permissive() {
  let tmp = TempDir::new().unwrap();
  write(tmp.path(), ".agents/workflow.json", "{ broken");
  assert_eq!(edit(tmp.path(), "src/app.ts"), json!({}));
}

// --- Maintenance commands ---

#[test]
fn sync_and_status_commands() {
  let tmp = TempDir::new().unwrap();
  write(
    tmp.path(),
    ".agents/work/queued.md",
    "## In Progress\n- **add-login** - Login form\n## Up Next\n- **add-logout** - Logout\n",
  );

  let output = run(tmp.path(), &["sync"], "");
  assert!(output.status.success());
  assert!(String::from_utf8_lossy(&output.stdout).contains("Adopted add-login"));
  assert_eq!(state(tmp.path())["currentWorkItem"], "add-login");

  let output = run(tmp.path(), &["status"], "");
  assert!(output.status.success());
  let stdout = String::from_utf8_lossy(&output.stdout);
  assert!(stdout.contains("work item: add-login"));
  assert!(stdout.contains("[Up Next] add-logout: Logout"));
  assert!(stdout.contains("pending:   1"));
}
