use quiz_core::model::SessionPhase;
use services::SessionView;
use services::session::clock_label;

/// What a line typed on the terminal means for the current screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Intent(services::QuizIntent),
    Quit,
    Ignored,
}

/// Quits from any screen. A bare `q` is a valid name on the login screen.
pub const QUIT_COMMAND: &str = ":q";

/// Map one input line to an intent for the screen `view` shows.
pub fn read_input(view: &SessionView, line: &str) -> Input {
    use services::QuizIntent;

    let line = line.trim();
    if line == QUIT_COMMAND
        || (line.eq_ignore_ascii_case("q") && view.phase != SessionPhase::LoggedOut)
    {
        return Input::Quit;
    }
    if view.loading {
        return Input::Ignored;
    }

    match view.phase {
        SessionPhase::AwaitingResumeDecision => match line {
            "y" | "Y" | "" => Input::Intent(QuizIntent::Resume),
            "n" | "N" => Input::Intent(QuizIntent::StartFresh),
            _ => Input::Ignored,
        },
        SessionPhase::LoggedOut => Input::Intent(QuizIntent::Login(line.to_string())),
        SessionPhase::RulesShown => match line {
            "" | "s" | "S" => Input::Intent(QuizIntent::StartQuiz),
            _ => Input::Ignored,
        },
        SessionPhase::InProgress => {
            let Some(question) = view.question.as_ref() else {
                return Input::Ignored;
            };
            line.parse::<usize>()
                .ok()
                .and_then(|choice| choice.checked_sub(1))
                .and_then(|idx| question.options.get(idx))
                .map_or(Input::Ignored, |option| {
                    Input::Intent(QuizIntent::SelectAnswer(option.clone()))
                })
        }
        SessionPhase::Finished => match line {
            "r" | "R" | "" => Input::Intent(QuizIntent::Reset),
            "l" | "L" => Input::Intent(QuizIntent::Logout),
            _ => Input::Ignored,
        },
    }
}

/// Text for `next`, or `None` when only the clock moved and the change is not
/// worth a line.
pub fn render(previous: Option<&SessionView>, next: &SessionView) -> Option<String> {
    if let Some(previous) = previous {
        if previous == next {
            return None;
        }
        let same_screen = previous.phase == next.phase
            && previous.question == next.question
            && previous.loading == next.loading
            && previous.start_failure == next.start_failure;
        if same_screen {
            return next
                .time_remaining_secs
                .filter(|secs| *secs <= 10 || secs % 30 == 0)
                .map(|secs| format!("  time left {}", clock_label(secs)));
        }
    }

    let mut out = String::new();
    match next.phase {
        SessionPhase::AwaitingResumeDecision => {
            out.push_str("An unfinished quiz was found.\n");
            out.push_str("Resume it? [Y/n]");
        }
        SessionPhase::LoggedOut => {
            out.push_str("Welcome to the quiz.\n");
            out.push_str(&format!("Enter your name ({QUIT_COMMAND} to quit):"));
        }
        SessionPhase::RulesShown => {
            let name = next.player.as_deref().unwrap_or_default();
            out.push_str(&format!("Hello {name}.\n"));
            out.push_str("Answer as many questions as you can before the clock runs out.\n");
            out.push_str("Unanswered questions count as neither right nor wrong.\n");
            if next.loading {
                out.push_str("Loading questions...");
            } else {
                if let Some(reason) = next.start_failure.as_deref() {
                    out.push_str(&format!("Could not start the quiz: {reason}\n"));
                }
                out.push_str("Press Enter to start, q to quit.");
            }
        }
        SessionPhase::InProgress => {
            if let Some(question) = next.question.as_ref() {
                let secs = next.time_remaining_secs.unwrap_or_default();
                out.push_str(&format!(
                    "\nQuestion {}/{}  [{} | {}]  time left {}\n",
                    question.number,
                    question.total,
                    question.category,
                    question.difficulty,
                    clock_label(secs)
                ));
                out.push_str(&question.text);
                for (idx, option) in question.options.iter().enumerate() {
                    out.push_str(&format!("\n  {}) {option}", idx + 1));
                }
            }
        }
        SessionPhase::Finished => {
            if let Some(results) = next.results {
                out.push_str("\nQuiz finished.\n");
                out.push_str(&format!(
                    "Correct: {}  Wrong: {}  Unanswered: {}  Total: {}\n",
                    results.correct, results.wrong, results.unanswered, results.total
                ));
                out.push_str(&format!("Score: {}%\n", results.percentage));
            }
            out.push_str("r to play again, l to log out, q to quit.");
        }
    }
    Some(out)
}
