//! Prompt text sent to the model.

use indoc::formatdoc;

pub const SCHEDULER_SYSTEM: &str =
    "You are an AI scheduling assistant that helps organize calendar events efficiently.";

pub const SCREENSHOT_SYSTEM: &str = "You are an AI assistant that analyzes screenshots of calendar events and extracts structured data.";

pub const SCREENSHOT_INSTRUCTIONS: &str = "Extract the event details from this image and return them in JSON format. Look for title, date, start time, end time, location, and any other relevant details.";

pub const VOICE_SYSTEM: &str = "You are an AI assistant that extracts structured task information from voice notes. Extract all relevant details and format them as JSON.";

pub const DEADLINE_SYSTEM: &str = "You are an AI deadline assistant that helps suggest reasonable deadlines for tasks based on their content and nature.";

/// `events_json` and `tasks_json` are the serialized fixed events and heap tasks.
pub fn schedule(events_json: &str, tasks_json: &str) -> String {
    formatdoc! {r#"
        Analyze these calendar events and heap tasks to create an optimal scheduling plan.

        Current calendar events:
        {events_json}

        Heap tasks to schedule:
        {tasks_json}

        Create a scheduling plan that:
        1. Prioritizes tasks based on due dates and estimated durations
        2. Avoids conflicts with existing events
        3. Considers optimal time of day for different task types
        4. Leaves reasonable breaks between events
        5. Makes use of available time slots efficiently

        Return recommendations in this JSON format:
        {{
          "recommendations": [
            {{
              "taskId": number,
              "title": string,
              "suggestedStartDate": string (ISO datetime),
              "suggestedEndDate": string (ISO datetime),
              "priority": "high" | "medium" | "low",
              "reasoning": string
            }}
          ]
        }}
    "#,
        events_json = events_json,
        tasks_json = tasks_json,
    }
}

pub fn voice_task(transcript: &str) -> String {
    formatdoc! {r#"
        Extract task details from this transcribed voice note: "{transcript}".
        Return a JSON object with these fields:
        - title: the main task name
        - description: any additional details about the task
        - dueDate: any mentioned deadline or due date (in YYYY-MM-DD format, or null if not specified)
        - estimatedDuration: any mentioned duration in minutes, or your best guess based on the task description
        - priority: "high", "medium", or "low" based on urgency clues
        - location: any mentioned location, or null if not specified
    "#,
        transcript = transcript,
    }
}

pub fn deadline(title: &str, description: &str) -> String {
    let description = if description.trim().is_empty() {
        "No description provided"
    } else {
        description
    };

    formatdoc! {r#"
        Based on this heap task, suggest an appropriate deadline. The task details are:

        Title: {title}
        Description: {description}

        Analyze the task details and suggest:
        1. A reasonable deadline date (in YYYY-MM-DD format)
        2. The priority level ("high", "medium", or "low")
        3. The reasoning behind this deadline suggestion

        Return the suggestion in this JSON format:
        {{
          "suggestedDueDate": string (YYYY-MM-DD),
          "priority": "high" | "medium" | "low",
          "reasoning": string
        }}
    "#,
        title = title,
        description = description,
    }
}
