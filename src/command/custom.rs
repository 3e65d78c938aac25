use super::FfmpegCommand;
use crate::error::Result;

/// Split `"-flag value"` entries into two tokens; anything else is kept whole
fn split_options<I, S>(options: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut tokens = Vec::new();
    for option in options {
        let option = option.into();
        let parts: Vec<&str> = option.split(' ').collect();
        if parts.len() == 2 {
            tokens.push(parts[0].to_string());
            tokens.push(parts[1].to_string());
        } else {
            tokens.push(option);
        }
    }
    tokens
}

impl FfmpegCommand {
    /// Add free-form options to the current input, e.g. `["-thread_queue_size 512"]`
    pub fn input_options<I, S>(&mut self, options: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let input = self.current_input_mut()?;
        input.options.append(split_options(options));
        Ok(self)
    }

    /// Add one option and its value to the current input, verbatim
    pub fn input_option<F: Into<String>, V: Into<String>>(
        &mut self,
        flag: F,
        value: V,
    ) -> Result<&mut Self> {
        self.current_input_mut()?
            .options
            .append([flag.into(), value.into()]);
        Ok(self)
    }

    /// Add free-form options to the current output, e.g. `["-movflags +faststart"]`
    pub fn output_options<I, S>(&mut self, options: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let tokens = split_options(options);
        self.current_output_mut().options.append(tokens);
        self
    }

    /// Add one option and its value to the current output, verbatim
    pub fn output_option<F: Into<String>, V: Into<String>>(&mut self, flag: F, value: V) -> &mut Self {
        self.current_output_mut()
            .options
            .append([flag.into(), value.into()]);
        self
    }
}
