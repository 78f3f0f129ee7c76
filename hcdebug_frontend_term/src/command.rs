use nom::branch::alt;
use nom::bytes::complete::{is_not, tag, tag_no_case};
use nom::character::complete::{alphanumeric1, char, digit1, space0, space1};
use nom::combinator::{all_consuming, eof, map, map_res, not, opt, value};
use nom::sequence::{delimited, preceded, terminated, tuple};
use nom::IResult;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    ShowUsage,
    Draw,
    Click(usize),
    Toggle(usize),
    Edit(usize, String),
    Select(usize, usize),
    Close(usize),
    Frames(u32),
    Step,
    Pause,
    Resume,
    Reset,
    Quit,
    RepeatCommand(Box<Command>, u32),
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CommandError {
    #[error("Unknown command \"{0}\", type help for usage")]
    Invalid(String),
}

impl Command {
    pub fn parse(input: &str) -> Result<Command, CommandError> {
        let line = input.trim_end_matches(|c| c == '\r' || c == '\n');

        match all_consuming(delimited(space0, parse_command, space0))(line) {
            Ok((_, command)) => Ok(command),
            Err(_) => Err(CommandError::Invalid(line.trim().to_string())),
        }
    }
}

fn parse_command(input: &str) -> IResult<&str, Command> {
    alt((
        parse_draw,
        parse_show_usage,
        parse_click,
        parse_toggle,
        parse_edit,
        parse_select,
        parse_close,
        parse_frames,
        parse_step,
        parse_pause,
        parse_resume,
        parse_reset,
        parse_quit,
        parse_repeat_command,
    ))(input)
}

fn parse_draw(input: &str) -> IResult<&str, Command> {
    alt((
        value(Command::Draw, eof),
        value(Command::Draw, keyword("draw", "d")),
    ))(input)
}

fn parse_show_usage(input: &str) -> IResult<&str, Command> {
    alt((
        value(Command::ShowUsage, keyword("help", "h")),
        value(Command::ShowUsage, tag("?")),
    ))(input)
}

fn parse_click(input: &str) -> IResult<&str, Command> {
    map(
        preceded(keyword("click", "c"), preceded(space1, parse_usize)),
        Command::Click,
    )(input)
}

fn parse_toggle(input: &str) -> IResult<&str, Command> {
    map(
        preceded(keyword("toggle", "t"), preceded(space1, parse_usize)),
        Command::Toggle,
    )(input)
}

fn parse_edit(input: &str) -> IResult<&str, Command> {
    map(
        tuple((
            keyword("edit", "e"),
            preceded(space1, parse_usize),
            preceded(space1, is_not(" \t")),
        )),
        |(_, handle, text): (_, usize, &str)| Command::Edit(handle, text.to_string()),
    )(input)
}

fn parse_select(input: &str) -> IResult<&str, Command> {
    map(
        tuple((
            keyword("select", "sel"),
            preceded(space1, parse_usize),
            preceded(space1, parse_usize),
        )),
        |(_, handle, index)| Command::Select(handle, index),
    )(input)
}

fn parse_close(input: &str) -> IResult<&str, Command> {
    map(
        preceded(keyword("close", "x"), preceded(space1, parse_usize)),
        Command::Close,
    )(input)
}

fn parse_frames(input: &str) -> IResult<&str, Command> {
    map(
        preceded(keyword("frames", "f"), opt(preceded(space1, parse_u32))),
        |count| Command::Frames(count.unwrap_or(1)),
    )(input)
}

fn parse_step(input: &str) -> IResult<&str, Command> {
    value(Command::Step, keyword("step", "s"))(input)
}

fn parse_pause(input: &str) -> IResult<&str, Command> {
    value(Command::Pause, keyword("pause", "p"))(input)
}

fn parse_resume(input: &str) -> IResult<&str, Command> {
    value(Command::Resume, keyword("resume", "go"))(input)
}

fn parse_reset(input: &str) -> IResult<&str, Command> {
    value(Command::Reset, keyword("reset", "reset"))(input)
}

fn parse_quit(input: &str) -> IResult<&str, Command> {
    value(Command::Quit, keyword("quit", "q"))(input)
}

fn parse_repeat_command(input: &str) -> IResult<&str, Command> {
    map(
        tuple((
            keyword("repeat", "r"),
            preceded(
                space1,
                delimited(
                    char('('),
                    delimited(space0, parse_command, space0),
                    char(')'),
                ),
            ),
            preceded(space1, parse_u32),
        )),
        |(_, command, count)| Command::RepeatCommand(Box::new(command), count),
    )(input)
}

//
// helpers
//

/// Long or short command name, not followed by more letters.
fn keyword<'a>(long: &'static str, short: &'static str)
    -> impl FnMut(&'a str) -> IResult<&'a str, &'a str> {
    terminated(
        alt((tag_no_case(long), tag_no_case(short))),
        not(alphanumeric1),
    )
}

fn parse_usize(input: &str) -> IResult<&str, usize> {
    map_res(digit1, str::parse::<usize>)(input)
}

fn parse_u32(input: &str) -> IResult<&str, u32> {
    map_res(digit1, str::parse::<u32>)(input)
}

pub fn usage() -> &'static str {
    "\
Command Name                Short   Description
--------------------------------------------------------------------------
Draw                        d       redraws every window (also: empty line)
Click n                     c       presses button [n]
Toggle n                    t       flips checkbox [n]
Edit n value                e       types value into field [n] and commits it
Select n index              sel     picks entry index in list [n]
Close n                     x       closes the window whose close box is [n]
Frames [count]              f       runs count frames (default 1)
Step                        s       runs one instruction
Pause                       p       pauses the game
Resume                      go      resumes the game
Reset                               resets the machine
Quit                        q       exits
Repeat (command) n          r       repeats command n times
Help                        h, ?    shows this text"
}
