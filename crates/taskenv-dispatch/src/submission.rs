/// The `submit` verb's shell script (spec §6 "Submission format"): reverse
/// out the oracle test patch's own edits (if one was applied — `git apply
/// -R` on a nonexistent or already-absent file is a harmless no-op), ignore
/// the patch file itself plus any scratch files the agent may have left
/// behind, stage everything else, and print the cached diff delimited by
/// the literal sentinels the session's extraction looks for.
pub fn submit_script() -> String {
    format!(
        r#"git apply -R {path} > /dev/null 2>&1 || true
printf '%s\n' '{path}' >> .gitignore
git add -A
patch=$(git diff --cached)
printf '<<SUBMISSION||%s||SUBMISSION>>' "$patch""#,
        path = taskenv_core::TEST_PATCH_PATH
    )
}
