//! Review prompt builder.
//!
//! The prompt carries the PR title/description, a precision-specific
//! instruction block, the filtered diff, the exact response grammar the
//! parser understands, and the tenant's custom fragment at the end.
//!
//! The grammar brackets every section body in `$$ ... $$` so the model can
//! embed markdown, code fences and colons freely — a newline- or colon-split
//! protocol would break on code blocks.

use tenant_config::{Precision, RepositoryPolicy};

/// Builds the full review prompt for one PR.
pub fn build_review_prompt(
    title: &str,
    description: &str,
    diff: &str,
    policy: &RepositoryPolicy,
) -> String {
    let mut s = String::new();
    s.push_str(
        "You are Gale, an AI code review assistant. Review this GitHub pull request \
         and provide constructive, actionable feedback.\n\n",
    );
    s.push_str(&format!("**PR Title:** {title}\n\n"));
    s.push_str(&format!("**PR Description:** {description}\n\n"));
    s.push_str(precision_guidelines(policy.precision));
    s.push_str("\n\n**Code Changes:**\n");
    s.push_str(diff);
    s.push_str(
        "\n\n**Review Guidelines:**\n\
         - Be constructive and explain the \"why\" behind suggestions\n\
         - Include code examples when suggesting alternatives\n\
         - Use collaborative language (\"we could\" vs \"you should\")\n\
         - Focus on logic correctness, security, maintainability, and team conventions\n\
         - Acknowledge good patterns when present\n\n\
         **Comment Categories - Use these prefixes:**\n\
         - 🧰 **nit**: Minor style/preference issues, non-blocking\n\
         - 💡 **suggestion**: Improvements that would be nice but aren't required\n\
         - ⚠️ **issue**: Problems that should be addressed before merging\n\
         - 🚫 **blocking**: Critical issues that must be fixed\n\
         - ❓ **question**: Seeking clarification about intent or approach\n\n\
         **Focus Areas - Use these prefixes when relevant:**\n\
         - 🎨 **style**: Formatting, naming conventions\n\
         - ⚡ **perf**: Performance concerns\n\
         - 🔒 **security**: Security-related issues\n\
         - 📚 **docs**: Documentation needs\n\
         - 🧪 **test**: Testing coverage or quality\n\
         - 🔧 **refactor**: Code organization improvements\n\n\
         **Response Structure:**\n\
         Structure your response EXACTLY as follows:\n\n\
         SUMMARY: $$\n\
         A warm, engaging overall summary of the changes: what the PR accomplishes, \
         key changes, impact on the codebase, good patterns you noticed, and any \
         overarching concerns.\n\
         $$\n\n\
         POEM: $$\n\
         A short, lighthearted poem (2-4 lines) inspired by the changes, in italics.\n\
         $$\n\n\
         For any line-specific comments, use this EXACT format:\n\
         PR_COMMENT:filename:line_number: [emoji] **[category]**: $$\n\
         your comment here (can be multiple lines, may include code examples)\n\
         $$\n\n\
         Example:\n\
         PR_COMMENT:src/app.rs:45: 🧰 **nit**: $$ Consider a more descriptive name \
         than `cnt`. $$\n\n\
         **IMPORTANT Rules:**\n\
         - Use SINGLE line numbers only, NOT ranges like \"75-82\"\n\
         - Always include the colon after **[category]**:\n\
         - Always use the $$ delimiters for all sections\n\
         - Keep general analysis in SUMMARY, use PR_COMMENT only for specific line feedback\n",
    );

    if !policy.custom_prompt.is_empty() {
        s.push('\n');
        s.push_str(&policy.custom_prompt);
        s.push('\n');
    }

    s.push_str("\nBe constructive, helpful, and focus on actionable feedback.\n");
    s
}

/// Precision-specific instruction block.
fn precision_guidelines(precision: Precision) -> &'static str {
    match precision {
        Precision::Minor => {
            "**Review Focus (Minor Precision):**\n\
             - Focus primarily on critical bugs and security issues\n\
             - Skip most style and formatting comments\n\
             - Be lenient with minor code quality issues\n\
             - Emphasize 🚫 **blocking** and ⚠️ **issue** categories"
        }
        Precision::Strict => {
            "**Review Focus (Strict Precision):**\n\
             - Review all aspects including style, performance, and maintainability\n\
             - Be thorough with naming conventions and code organization\n\
             - Suggest improvements for readability and best practices\n\
             - Use all categories including 🧰 **nit** and 💡 **suggestion**\n\
             - Consider long-term maintainability and team standards"
        }
        Precision::Medium => {
            "**Review Focus (Medium Precision):**\n\
             - Balance between thoroughness and practicality\n\
             - Focus on significant issues while noting important style concerns\n\
             - Emphasize security, bugs, and maintainability\n\
             - Use ⚠️ **issue**, 💡 **suggestion**, and 🧰 **nit** categories appropriately"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy(precision: Precision, custom: &str) -> RepositoryPolicy {
        RepositoryPolicy {
            name: "repo".into(),
            precision,
            custom_prompt: custom.into(),
        }
    }

    #[test]
    fn prompt_carries_title_description_and_diff() {
        let p = build_review_prompt(
            "Add login",
            "Implements session auth",
            "=== src/auth.rs ===\n+fn login() {}",
            &policy(Precision::Medium, ""),
        );
        assert!(p.contains("**PR Title:** Add login"));
        assert!(p.contains("Implements session auth"));
        assert!(p.contains("=== src/auth.rs ==="));
    }

    #[test]
    fn precision_selects_the_instruction_block() {
        let minor = build_review_prompt("t", "d", "", &policy(Precision::Minor, ""));
        assert!(minor.contains("Minor Precision"));
        let strict = build_review_prompt("t", "d", "", &policy(Precision::Strict, ""));
        assert!(strict.contains("Strict Precision"));
        assert!(strict.contains("long-term maintainability"));
    }

    #[test]
    fn custom_fragment_is_appended_when_present() {
        let p = build_review_prompt(
            "t",
            "d",
            "",
            &policy(Precision::Medium, "Never comment on tests."),
        );
        assert!(p.contains("Never comment on tests."));

        let without = build_review_prompt("t", "d", "", &policy(Precision::Medium, ""));
        assert!(!without.contains("Never comment on tests."));
    }

    #[test]
    fn grammar_rules_are_mandated() {
        let p = build_review_prompt("t", "d", "", &policy(Precision::Medium, ""));
        assert!(p.contains("SUMMARY: $$"));
        assert!(p.contains("POEM: $$"));
        assert!(p.contains("PR_COMMENT:filename:line_number:"));
        assert!(p.contains("SINGLE line numbers only"));
    }
}
