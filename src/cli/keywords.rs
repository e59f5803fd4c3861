use anyhow::Result;

use anima::config::AnimaConfig;
use anima::engine::Anima;

/// Print the keywords extracted from `text`. Touches no stored data.
pub fn keywords(config: &AnimaConfig, text: &str, max: Option<usize>) -> Result<()> {
    let analysis = Anima::new(config).analyze_keywords(text, max);

    println!("Keywords:   {}", analysis.keywords.join(", "));
    println!("Cleaned:    {}", analysis.cleaned_text);
    println!("Word count: {}", analysis.word_count);

    Ok(())
}
