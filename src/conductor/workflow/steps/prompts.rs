//! Prompt templates for the built-in steps

pub const PLANNER: &str = "You are an expert planner. Your job is to create a clear, concise, and actionable step-by-step plan
to achieve the following objective. Respond with nothing but the plan, formatted as a numbered list.

Objective: {objective}
";

pub const RESEARCHER: &str = "You are a master researcher. Based on the provided internal knowledge and external web search results,
synthesize a comprehensive summary that will help achieve the following objective. Focus only on the most relevant information.

Objective: {objective}
Plan: {plan}

Context:
{context}

Provide a concise research summary:
";

pub const CODER: &str = "You are a world-class Python programmer. Based on the provided objective and research summary,
write clean, efficient, and well-documented Python code to solve the problem.

Objective: {objective}
Research Summary: {narrative_summary}

Respond with ONLY the Python code inside a single ```python ... ``` block.
";

pub const WRITER: &str = "You are a professional technical writer. Your task is to generate a comprehensive Markdown report
based on the work done by the AI agents. The report should be well-structured and easy to read.

Objective: {objective}

---

### Plan
{plan}

---

### Research Summary
{narrative_summary}

---

### Generated Code
{code}

---

### Final Summary
Provide a brief summary of the entire process and the final outcome.
";

/// Few-shot: one worked example, then the text to parse
pub const EXTRACTOR: &str = "Your task is to act as an extremely precise data parser. Extract label-value pairs from a text and format them WITHOUT ANY ADDITIONAL TEXT.

--- PERFECT EXAMPLE ---
Input text: \"The population of Asia is 4.6 billion. Africa has 1.3 billion inhabitants, and Europe about 0.74 billion.\"
Your output: Asia:4.6, Africa:1.3, Europe:0.74
--- END OF EXAMPLE ---

Based on this example, parse the following text. Output ONLY the formatted data list. Do not say \"here is the data\" or anything else.

Text to parse:
>>>
{narrative_summary}
>>>

Extracted data:
";

/// Research context block handed to the researcher prompt
pub fn research_context(memory: &str, web: &str) -> String {
    format!(
        "Memory (Internal Knowledge):\n{}\n\nWeb Search Results (External Knowledge):\n{}",
        memory, web
    )
}
