// All LLM prompt constants for cover-letter generation.

/// System prompt for the letter-writing call.
pub const COVER_LETTER_SYSTEM: &str =
    "You are an expert cover letter writer specializing in personalized, \
    professional cover letters for job applications. \
    Highlight relevant experience that matches the job requirements, \
    demonstrate understanding of the company and role, \
    and keep the letter concise (3-4 paragraphs). \
    Return only the letter text, ready to send, with no commentary.";

/// Letter prompt template. Replace each `{placeholder}` before sending.
pub const COVER_LETTER_PROMPT_TEMPLATE: &str = r#"Write a personalized cover letter for the following job application.

**Job Title:** {job_title}
**Company:** {company}

**Job Description:**
{job_description}

**Candidate Profile:**
Name: {full_name}
Bio: {bio}

**Skills:** {skills}
**Experience:** {experience}
**Languages:** {languages}

**Target Keywords:** {target_keywords}

The letter must:
1. Open with enthusiasm for the specific role and company
2. Highlight the most relevant experience and skills from the candidate's background
3. Show understanding of the job requirements
4. Close with confidence and next steps

The tone should be professional but engaging. Keep it to 3-4 paragraphs maximum."#;
